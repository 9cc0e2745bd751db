// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Case Data Client
//!
//! Client-side consistency and collection layer for a case-management data
//! store whose reads go through an eventually-consistent search index.
//!
//! ## Features
//!
//! - **Paginated collection**: probe the page count, fetch every page in order
//! - **Consistency polling**: repeat a search until the index reports the
//!   expected number of hits, within a bounded retry budget
//! - **Single-shot search**: one request, empty on a null response
//! - **Validated headers**: caller token checked before any network call,
//!   service-to-service token attached to every request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use case_data_client::{CaseClient, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_file("client.yaml")?;
//!     let client = CaseClient::from_config(&config)?;
//!
//!     let references = vec!["2400001/2024".to_string(), "2400002/2024".to_string()];
//!     let cases = client
//!         .retrieve_cases_by_reference_with_retries(&token, "ET_EnglandWales", &references)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          CaseClient                           │
//! │  retrieve_cases()   search()   *_with_retries()   writes      │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬────────────┬─────┴──────┬────────────┬────────────┐
//! │   Auth    │    HTTP    │  Paginate  │    Poll    │   Search   │
//! ├───────────┼────────────┼────────────┼────────────┼────────────┤
//! │ Headers   │ Transport  │ Metadata   │ Retry      │ Queries    │
//! │ S2S token │ Rate Limit │ Page fetch │ Sleeper    │ Date range │
//! │ User id   │ Timeout    │            │ Diff report│            │
//! └───────────┴────────────┴────────────┴────────────┴────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Data transfer objects
pub mod models;

/// Header building and auth collaborators
pub mod auth;

/// HTTP transport with rate limiting
pub mod http;

/// Data store URL builders
pub mod urls;

/// Paginated collection
pub mod pagination;

/// Consistency polling
pub mod poll;

/// Search query payloads
pub mod search;

/// Missing-reference reporting
pub mod report;

/// The case data client
pub mod client;

/// Client configuration
pub mod config;

/// Tracing subscriber setup
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{CaseClient, CaseClientBuilder};
pub use config::ClientConfig;
pub use models::{SearchResult, StartEventResponse, SubmitEvent, SubmitMultipleEvent};
pub use poll::{Expectation, PollOutcome, PollState, RetryPolicy};
pub use search::{DateRange, SearchQuery};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
