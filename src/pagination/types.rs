//! Pagination types and traits
//!
//! Defines the page count probe result and the page source abstraction the
//! collector drives.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of the page count probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Total number of matching records, when the backend reports it
    #[serde(default)]
    pub total_results_count: Option<i64>,
    /// Number of pages to fetch
    #[serde(default)]
    pub total_pages_count: Option<i64>,
}

impl PageMetadata {
    /// Create metadata reporting `pages` pages
    pub fn with_pages(pages: i64) -> Self {
        Self {
            total_results_count: None,
            total_pages_count: Some(pages),
        }
    }

    /// Validated page count; absent or negative counts violate the contract
    pub fn page_count(&self) -> Result<u32> {
        let count = self
            .total_pages_count
            .ok_or_else(|| Error::page_metadata("total_pages_count is absent"))?;

        u32::try_from(count).map_err(|_| {
            Error::page_metadata(format!("total_pages_count {count} is out of range"))
        })
    }
}

/// A bulk resource that can be read one page at a time
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Probe the number of pages
    async fn metadata(&self) -> Result<PageMetadata>;

    /// Fetch one page (1-based); `None` means the backend returned no body
    async fn fetch_page(&self, page: u32) -> Result<Option<Vec<T>>>;
}
