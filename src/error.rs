//! Error types for the case data client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Two outcomes that look like failures are deliberately absent: a poll
//! that never converges returns its last observation, and a page that comes
//! back empty contributes no records.

use thiserror::Error;

/// The main error type for the case data client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Validation Errors
    // ============================================================================
    #[error("Invalid auth token: {message}")]
    InvalidAuthToken { message: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Service authorization failed: {message}")]
    ServiceAuth { message: String },

    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    #[error("User lookup failed: {message}")]
    UserLookup { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    // ============================================================================
    // Contract Errors
    // ============================================================================
    #[error("Invalid page metadata: {message}")]
    PageMetadata { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },

    // ============================================================================
    // Polling Errors
    // ============================================================================
    #[error("Poll interrupted after attempt {attempt}")]
    PollInterrupted { attempt: u32 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid auth token error
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidAuthToken {
            message: message.into(),
        }
    }

    /// Create a service auth error
    pub fn service_auth(message: impl Into<String>) -> Self {
        Self::ServiceAuth {
            message: message.into(),
        }
    }

    /// Create a user lookup error
    pub fn user_lookup(message: impl Into<String>) -> Self {
        Self::UserLookup {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a page metadata contract error
    pub fn page_metadata(message: impl Into<String>) -> Self {
        Self::PageMetadata {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Whether the error was raised before any network call was made
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAuthToken { .. } | Error::InvalidDate { .. }
        )
    }

    /// Whether the error came from the transport (connection or non-2xx)
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::HttpStatus { .. })
    }
}

/// Result type alias for the case data client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("data_store.base_url");
        assert_eq!(
            err.to_string(),
            "Missing required config field: data_store.base_url"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::PollInterrupted { attempt: 3 };
        assert_eq!(err.to_string(), "Poll interrupted after attempt 3");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::invalid_token("bad char").is_input_error());
        assert!(Error::invalid_date("2024-13-01", "bad month").is_input_error());
        assert!(!Error::http_status(500, "").is_input_error());

        assert!(Error::http_status(503, "").is_transport_error());
        assert!(!Error::page_metadata("negative").is_transport_error());
        assert!(!Error::config("test").is_transport_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
