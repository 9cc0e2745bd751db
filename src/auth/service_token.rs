//! Service-to-service token generators
//!
//! The data store requires a second token identifying the calling service.
//! Tokens come from one of three sources: a fixed value, a lease endpoint
//! on the service auth provider, or a locally signed HS256 JWT.

use super::types::CachedToken;
use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// Lease lifetime assumed when the leased token carries no `exp` claim
const DEFAULT_LEASE_SECONDS: i64 = 3 * 60 * 60;

/// Source of service-to-service tokens
#[async_trait]
pub trait ServiceTokenGenerator: Send + Sync {
    /// Produce a token (without the `Bearer ` prefix)
    async fn generate(&self) -> Result<String>;
}

// ============================================================================
// Static
// ============================================================================

/// A fixed service token
#[derive(Debug, Clone)]
pub struct StaticServiceToken {
    token: String,
}

impl StaticServiceToken {
    /// Create a generator that always returns `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl ServiceTokenGenerator for StaticServiceToken {
    async fn generate(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

// ============================================================================
// Lease
// ============================================================================

/// Leases tokens from a service auth provider and caches them until expiry
pub struct LeaseServiceToken {
    lease_url: Url,
    microservice: String,
    http_client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Serialize)]
struct LeaseRequest<'a> {
    microservice: &'a str,
}

impl LeaseServiceToken {
    /// Create a lease generator for `microservice` against the provider at `base_url`
    pub fn new(base_url: &Url, microservice: impl Into<String>) -> Result<Self> {
        Self::with_client(base_url, microservice, Client::new())
    }

    /// Create a lease generator with a custom HTTP client
    pub fn with_client(
        base_url: &Url,
        microservice: impl Into<String>,
        http_client: Client,
    ) -> Result<Self> {
        let lease_url = crate::urls::join_path(base_url, "lease")?;
        Ok(Self {
            lease_url,
            microservice: microservice.into(),
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Clear the cached token, forcing a new lease on the next call
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    async fn lease(&self) -> Result<CachedToken> {
        let response = self
            .http_client
            .post(self.lease_url.clone())
            .json(&LeaseRequest {
                microservice: &self.microservice,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service_auth(format!(
                "Lease request failed with status {status}: {body}"
            )));
        }

        let token = response.text().await?.trim().to_string();
        if token.is_empty() {
            return Err(Error::service_auth("Lease response was empty"));
        }

        debug!(microservice = %self.microservice, "leased service token");

        Ok(match jwt_expiry(&token) {
            Some(expires_at) => CachedToken::until(token, expires_at),
            None => CachedToken::for_seconds(token, DEFAULT_LEASE_SECONDS),
        })
    }
}

#[async_trait]
impl ServiceTokenGenerator for LeaseServiceToken {
    async fn generate(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.needs_refresh() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.lease().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }
}

impl std::fmt::Debug for LeaseServiceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaseServiceToken")
            .field("lease_url", &self.lease_url.as_str())
            .field("microservice", &self.microservice)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying its signature
pub(crate) fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claim.exp?, 0)
}

// ============================================================================
// Self-signed JWT
// ============================================================================

/// Signs short-lived HS256 tokens locally
#[derive(Debug, Clone)]
pub struct JwtServiceToken {
    microservice: String,
    secret: String,
    lifetime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ServiceClaims {
    pub(crate) sub: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

impl JwtServiceToken {
    /// Create a signer for `microservice`
    pub fn new(
        microservice: impl Into<String>,
        secret: impl Into<String>,
        lifetime_seconds: u64,
    ) -> Self {
        Self {
            microservice: microservice.into(),
            secret: secret.into(),
            lifetime_seconds,
        }
    }
}

#[async_trait]
impl ServiceTokenGenerator for JwtServiceToken {
    async fn generate(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let claims = ServiceClaims {
            sub: self.microservice.clone(),
            iat: now,
            exp: now + self.lifetime_seconds as i64,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::JwtGeneration {
            message: format!("Failed to encode JWT: {e}"),
        })
    }
}
