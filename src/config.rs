//! Client configuration
//!
//! Everything needed to wire a `CaseClient` can be loaded from YAML:
//!
//! ```yaml
//! data_store:
//!   base_url: "http://ccd-data-store:4452"
//! idam:
//!   base_url: "http://idam-api:5000"
//! service_auth:
//!   type: lease
//!   url: "http://service-auth-provider:4502"
//!   microservice: ethos_repl_service
//! http:
//!   timeout_seconds: 30
//! polling:
//!   max_attempts: 7
//!   interval_seconds: 5
//!   on_interrupt: continue
//! ```

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::poll::RetryPolicy;
use crate::types::{InterruptPolicy, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Case data store
    pub data_store: DataStoreConfig,

    /// Identity service used to resolve the caseworker id
    #[serde(default)]
    pub idam: Option<IdamConfig>,

    /// Fixed caseworker id, used when no identity service is configured
    #[serde(default)]
    pub user_id: Option<String>,

    /// Service-to-service authentication
    pub service_auth: ServiceAuthConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Consistency polling settings
    #[serde(default)]
    pub polling: PollingConfig,
}

impl ClientConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        parse_url("data_store.base_url", &self.data_store.base_url)?;

        match (&self.idam, self.user_id.clone().none_if_empty()) {
            (Some(idam), _) => {
                parse_url("idam.base_url", &idam.base_url)?;
            }
            (None, Some(_)) => {}
            (None, None) => {
                return Err(Error::config(
                    "Either idam.base_url or user_id must be configured",
                ))
            }
        }

        self.service_auth.validate()?;

        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be greater than zero",
            ));
        }

        if self.polling.max_attempts == 0 {
            return Err(Error::invalid_value(
                "polling.max_attempts",
                "must be at least 1",
            ));
        }

        Ok(())
    }

    /// Parsed data store root
    pub fn data_store_url(&self) -> Result<Url> {
        parse_url("data_store.base_url", &self.data_store.base_url)
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url> {
    if value.trim().is_empty() {
        return Err(Error::missing_field(field));
    }
    Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))
}

// ============================================================================
// Endpoints
// ============================================================================

/// Case data store endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStoreConfig {
    /// Root of the case data API
    pub base_url: String,
}

/// Identity service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdamConfig {
    /// Root of the identity API
    pub base_url: String,
}

// ============================================================================
// Service Auth Config
// ============================================================================

/// How the service-to-service token is obtained
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceAuthConfig {
    /// Fixed token
    Static {
        /// Token value
        token: String,
    },

    /// Leased from a service auth provider
    Lease {
        /// Provider root URL
        url: String,
        /// Name of this microservice
        microservice: String,
    },

    /// Signed locally with a shared secret
    Jwt {
        /// Name of this microservice
        microservice: String,
        /// HS256 secret
        secret: String,
        /// Token lifetime
        #[serde(default = "default_token_lifetime")]
        lifetime_seconds: u64,
    },
}

fn default_token_lifetime() -> u64 {
    3600
}

impl ServiceAuthConfig {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Static { token } if token.trim().is_empty() => {
                Err(Error::missing_field("service_auth.token"))
            }
            Self::Lease { url, microservice } => {
                parse_url("service_auth.url", url)?;
                if microservice.trim().is_empty() {
                    return Err(Error::missing_field("service_auth.microservice"));
                }
                Ok(())
            }
            Self::Jwt {
                microservice,
                secret,
                lifetime_seconds,
            } => {
                if microservice.trim().is_empty() {
                    return Err(Error::missing_field("service_auth.microservice"));
                }
                if secret.is_empty() {
                    return Err(Error::missing_field("service_auth.secret"));
                }
                if *lifetime_seconds == 0 {
                    return Err(Error::invalid_value(
                        "service_auth.lifetime_seconds",
                        "must be greater than zero",
                    ));
                }
                Ok(())
            }
            Self::Static { .. } => Ok(()),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limiting
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: None,
            rate_limit: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ============================================================================
// Polling Config
// ============================================================================

/// Consistency poller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Search calls made before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts in seconds
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,

    /// Reaction to an interrupted pause
    #[serde(default)]
    pub on_interrupt: InterruptPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_seconds: default_interval(),
            on_interrupt: InterruptPolicy::default(),
        }
    }
}

impl PollingConfig {
    /// Retry budget described by this config
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.interval_seconds))
            .on_interrupt(self.on_interrupt)
    }
}

fn default_max_attempts() -> u32 {
    7
}

fn default_interval() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
data_store:
  base_url: "http://localhost:4452"
user_id: "caseworker-1"
service_auth:
  type: static
  token: "svc-token"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = ClientConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.data_store.base_url, "http://localhost:4452");
        assert_eq!(config.user_id.as_deref(), Some("caseworker-1"));
        assert!(config.idam.is_none());
        assert_eq!(config.http.timeout_seconds, 30);
        assert!(config.http.rate_limit.is_none());
    }

    #[test]
    fn test_default_polling_config() {
        let policy = PollingConfig::default().retry_policy();
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.on_interrupt, InterruptPolicy::Continue);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
data_store:
  base_url: "http://ccd:4452"
idam:
  base_url: "http://idam:5000"
service_auth:
  type: lease
  url: "http://s2s:4502"
  microservice: ethos_repl_service
http:
  timeout_seconds: 10
  user_agent: "bulk-worker/2"
  rate_limit:
    requests_per_second: 5
    burst_size: 2
polling:
  max_attempts: 3
  interval_seconds: 1
  on_interrupt: abort
"#;

        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            config.service_auth,
            ServiceAuthConfig::Lease { ref microservice, .. } if microservice == "ethos_repl_service"
        ));
        assert_eq!(config.http.rate_limit, Some(RateLimiterConfig::new(5, 2)));
        assert_eq!(config.polling.on_interrupt, InterruptPolicy::Abort);
        assert_eq!(config.polling.retry_policy().max_wait(), Duration::from_secs(2));
    }

    #[test]
    fn test_jwt_lifetime_default() {
        let auth: ServiceAuthConfig = serde_yaml::from_str(
            r#"
type: jwt
microservice: ethos
secret: "s3cret"
"#,
        )
        .unwrap();

        match auth {
            ServiceAuthConfig::Jwt {
                lifetime_seconds, ..
            } => assert_eq!(lifetime_seconds, 3600),
            _ => panic!("Expected Jwt service auth"),
        }
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let yaml = format!("{MINIMAL}polling:\n  max_attempts: 0\n");
        let err = ClientConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "polling.max_attempts"));
    }

    #[test]
    fn test_missing_user_source_rejected() {
        let yaml = r#"
data_store:
  base_url: "http://localhost:4452"
service_auth:
  type: static
  token: "svc"
"#;
        let err = ClientConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let yaml = MINIMAL.replace("http://localhost:4452", "not a url");
        let err = ClientConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "data_store.base_url"));
    }

    #[test]
    fn test_empty_static_token_rejected() {
        let yaml = MINIMAL.replace("\"svc-token\"", "\"\"");
        let err = ClientConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_store_url().unwrap().port(), Some(4452));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
