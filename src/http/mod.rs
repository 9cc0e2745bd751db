//! HTTP transport module
//!
//! Provides the transport collaborator the client core sends every request
//! through.
//!
//! # Features
//!
//! - **No automatic retries**: retry policy belongs to the consistency poller
//! - **Null-tolerant bodies**: an empty or `null` 2xx body is surfaced as `None`
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Timeouts**: Per-request timeout owned by the transport

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Transport};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
