//! Auth types
//!
//! Leased token entries and the user profile returned by the identity service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds before expiry at which a leased token is replaced
pub const REFRESH_MARGIN_SECONDS: i64 = 30;

/// A leased service token and the instant it stops being accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// Token value
    pub token: String,
    /// Expiry reported by the token itself, or assumed by the lessee
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Hold `token` until `expires_at`
    pub fn until(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Hold `token` for `seconds` from now
    pub fn for_seconds(token: impl Into<String>, seconds: i64) -> Self {
        Self::until(token, Utc::now() + Duration::seconds(seconds))
    }

    /// Time left before expiry; negative once expired
    pub fn remaining(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    /// Whether the token is expired or about to be
    pub fn needs_refresh(&self) -> bool {
        self.remaining() <= Duration::seconds(REFRESH_MARGIN_SECONDS)
    }
}

/// User profile returned by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    /// User id (the caseworker id in data store URLs)
    #[serde(alias = "uid")]
    pub id: String,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// First name
    #[serde(default)]
    pub forename: Option<String>,
    /// Last name
    #[serde(default)]
    pub surname: Option<String>,
    /// Granted roles
    #[serde(default)]
    pub roles: Vec<String>,
}
