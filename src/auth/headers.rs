//! Request header assembly
//!
//! The caller's token is checked against the allowed character set before
//! the service token generator is consulted, so a malformed token never
//! causes network traffic.

use super::service_token::ServiceTokenGenerator;
use crate::error::{Error, Result};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::{Arc, LazyLock};

/// Header carrying the service-to-service token
pub const SERVICE_AUTHORIZATION: &str = "ServiceAuthorization";

/// Content type sent with every request
const JSON_UTF8: &str = "application/json;charset=UTF-8";

/// Letters, digits, dots and whitespace only
static AUTH_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.\s]+$").expect("static regex"));

/// Check a caller-supplied token against the allowed character set
pub fn validate_auth_token(token: &str) -> Result<()> {
    if AUTH_TOKEN_REGEX.is_match(token) {
        Ok(())
    } else {
        Err(Error::invalid_token(
            "token may only contain letters, digits, '.' and whitespace",
        ))
    }
}

/// Builds the headers for a single data store request
#[derive(Clone)]
pub struct HeaderBuilder {
    service_tokens: Arc<dyn ServiceTokenGenerator>,
}

impl HeaderBuilder {
    /// Create a header builder backed by a service token generator
    pub fn new(service_tokens: Arc<dyn ServiceTokenGenerator>) -> Self {
        Self { service_tokens }
    }

    /// Validate the caller's token and assemble the request headers
    pub async fn build(&self, auth_token: &str) -> Result<HeaderMap> {
        validate_auth_token(auth_token)?;

        let service_token = self.service_tokens.generate().await?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value("Authorization", &bearer(auth_token))?);
        headers.insert(
            HeaderName::from_static("serviceauthorization"),
            header_value(SERVICE_AUTHORIZATION, &bearer(&service_token))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
        Ok(headers)
    }
}

impl std::fmt::Debug for HeaderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderBuilder").finish_non_exhaustive()
    }
}

/// Prefix `Bearer ` unless the token already carries it
pub(crate) fn bearer(token: &str) -> String {
    let token = token.trim();
    if token
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "))
    {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(bearer("abc.def"), "Bearer abc.def");
        assert_eq!(bearer("Bearer abc.def"), "Bearer abc.def");
        assert_eq!(bearer("bearer abc"), "bearer abc");
        assert_eq!(bearer("  tok "), "Bearer tok");
    }
}
