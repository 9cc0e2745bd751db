//! Caseworker id resolution
//!
//! Data store URLs embed the id of the user on whose behalf the call is made.

use super::headers::{bearer, validate_auth_token};
use super::types::UserDetails;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use url::Url;

/// Resolves the user id for a caller's token
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Return the user id the token belongs to
    async fn user_id(&self, auth_token: &str) -> Result<String>;
}

/// Looks the user up on the identity service's `/details` endpoint
#[derive(Debug, Clone)]
pub struct IdamUserResolver {
    details_url: Url,
    http_client: Client,
}

impl IdamUserResolver {
    /// Create a resolver for the identity service at `base_url`
    pub fn new(base_url: &Url) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a resolver with a custom HTTP client
    pub fn with_client(base_url: &Url, http_client: Client) -> Result<Self> {
        Ok(Self {
            details_url: crate::urls::join_path(base_url, "details")?,
            http_client,
        })
    }

    /// Fetch the full user profile
    pub async fn details(&self, auth_token: &str) -> Result<UserDetails> {
        validate_auth_token(auth_token)?;

        let response = self
            .http_client
            .get(self.details_url.clone())
            .header(AUTHORIZATION, bearer(auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::user_lookup(format!(
                "User details request failed with status {status}: {body}"
            )));
        }

        response
            .json::<UserDetails>()
            .await
            .map_err(|e| Error::user_lookup(format!("Malformed user details: {e}")))
    }
}

#[async_trait]
impl UserResolver for IdamUserResolver {
    async fn user_id(&self, auth_token: &str) -> Result<String> {
        Ok(self.details(auth_token).await?.id)
    }
}

/// Always resolves to the same user id
#[derive(Debug, Clone)]
pub struct StaticUserResolver {
    user_id: String,
}

impl StaticUserResolver {
    /// Create a resolver returning `user_id`
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl UserResolver for StaticUserResolver {
    async fn user_id(&self, _auth_token: &str) -> Result<String> {
        Ok(self.user_id.clone())
    }
}
