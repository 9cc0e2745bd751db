//! Tests for the HTTP transport module

use super::client::parse_body;
use super::*;
use crate::error::Error;
use crate::types::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{p}", server.uri())).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("case-data-client/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::new(5, 5))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 5)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());
}

#[test]
fn test_parse_body() {
    assert!(parse_body("").unwrap().is_none());
    assert!(parse_body("  \n").unwrap().is_none());
    assert!(parse_body("null").unwrap().is_none());
    assert_eq!(parse_body("[1,2]").unwrap(), Some(serde_json::json!([1, 2])));
    assert!(matches!(parse_body("{oops"), Err(Error::JsonParse(_))));
}

#[tokio::test]
async fn test_send_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1}
        ])))
        .mount(&mock_server)
        .await;

    let value = client()
        .send(Method::GET, &url(&mock_server, "/cases"), &HeaderMap::new(), None)
        .await
        .unwrap();

    assert_eq!(value.unwrap()[0]["id"], 1);
}

#[tokio::test]
async fn test_send_null_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/no-content"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client();
    let headers = HeaderMap::new();

    let value = client
        .send(Method::GET, &url(&mock_server, "/empty"), &headers, None)
        .await
        .unwrap();
    assert!(value.is_none());

    let value = client
        .send(Method::GET, &url(&mock_server, "/no-content"), &headers, None)
        .await
        .unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn test_send_post_with_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/searchCases"))
        .and(header("Authorization", "Bearer user"))
        .and(header("X-Default", "yes"))
        .and(body_json(serde_json::json!({"size": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total": 0,
            "cases": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .no_rate_limit()
            .header("X-Default", "yes")
            .build(),
    )
    .unwrap();

    let mut headers = HeaderMap::new();
    headers.insert("Authorization", HeaderValue::from_static("Bearer user"));

    let value = client
        .send(
            Method::POST,
            &url(&mock_server, "/searchCases"),
            &headers,
            Some(&serde_json::json!({"size": 1})),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(value["total"], 0);
}

#[tokio::test]
async fn test_send_does_not_retry_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client()
        .send(Method::GET, &url(&mock_server, "/flaky"), &HeaderMap::new(), None)
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = client()
        .send(Method::GET, &url(&mock_server, "/missing"), &HeaderMap::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert!(err.is_transport_error());
}

#[tokio::test]
async fn test_send_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .timeout(Duration::from_millis(100))
            .build(),
    )
    .unwrap();

    let err = client
        .send(Method::GET, &url(&mock_server, "/slow"), &HeaderMap::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
}
