//! Common types used throughout the case data client
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read
    #[default]
    GET,
    /// Create or search
    POST,
    /// Replace
    PUT,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Interrupt Policy
// ============================================================================

/// What the consistency poller does when a pause between attempts is interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptPolicy {
    /// Log the interruption and run the next attempt immediately
    #[default]
    Continue,
    /// Stop polling and return `Error::PollInterrupted`
    Abort,
}

// ============================================================================
// Multiple Source
// ============================================================================

/// How a multiple (group of cases) came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleSource {
    /// Created by a caseworker; the member cases already exist in the index
    Manual,
    /// Created by a bulk job that has just written the member cases
    #[default]
    Automatic,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let post: reqwest::Method = Method::POST.into();
        assert_eq!(reqwest::Method::POST, post);
        assert_eq!(Method::PUT.to_string(), "PUT");
    }

    #[test]
    fn test_interrupt_policy_serde() {
        let policy: InterruptPolicy = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(policy, InterruptPolicy::Abort);
        assert_eq!(InterruptPolicy::default(), InterruptPolicy::Continue);
    }

    #[test]
    fn test_multiple_source_serde() {
        let source: MultipleSource = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(source, MultipleSource::Manual);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some("  ".to_string()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
    }
}
