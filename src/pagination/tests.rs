//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Mutex;

/// In-memory page source that records every call
struct FakePages {
    metadata: Result<PageMetadata>,
    pages: Vec<Option<Vec<u32>>>,
    fail_on_page: Option<u32>,
    calls: Mutex<Vec<String>>,
}

impl FakePages {
    fn new(pages: Vec<Option<Vec<u32>>>) -> Self {
        Self {
            metadata: Ok(PageMetadata::with_pages(pages.len() as i64)),
            pages,
            fail_on_page: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_metadata(metadata: Result<PageMetadata>) -> Self {
        Self {
            metadata,
            pages: Vec::new(),
            fail_on_page: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource<u32> for FakePages {
    async fn metadata(&self) -> Result<PageMetadata> {
        self.calls.lock().unwrap().push("metadata".to_string());
        match &self.metadata {
            Ok(metadata) => Ok(*metadata),
            Err(e) => Err(Error::http_status(503, e.to_string())),
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<Option<Vec<u32>>> {
        self.calls.lock().unwrap().push(format!("page {page}"));
        if self.fail_on_page == Some(page) {
            return Err(Error::http_status(500, "boom"));
        }
        Ok(self.pages[(page - 1) as usize].clone())
    }
}

// ============================================================================
// PageMetadata Tests
// ============================================================================

#[test]
fn test_page_metadata_count() {
    assert_eq!(PageMetadata::with_pages(0).page_count().unwrap(), 0);
    assert_eq!(PageMetadata::with_pages(12).page_count().unwrap(), 12);
}

#[test]
fn test_page_metadata_rejects_absent_and_negative() {
    let err = PageMetadata::default().page_count().unwrap_err();
    assert!(matches!(err, Error::PageMetadata { .. }));

    let err = PageMetadata::with_pages(-1).page_count().unwrap_err();
    assert!(err.to_string().contains("-1"));
}

#[test]
fn test_page_metadata_serde() {
    let metadata: PageMetadata =
        serde_json::from_str(r#"{"total_results_count": 51, "total_pages_count": 2}"#).unwrap();
    assert_eq!(metadata.total_results_count, Some(51));
    assert_eq!(metadata.page_count().unwrap(), 2);
}

// ============================================================================
// Collector Tests
// ============================================================================

#[tokio::test]
async fn test_collect_pages_in_order() {
    let source = FakePages::new(vec![Some(vec![1, 2]), Some(vec![3]), Some(vec![4, 5, 6])]);

    let records = collect_pages(&source).await.unwrap();

    assert_eq!(records, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(
        source.calls(),
        vec!["metadata", "page 1", "page 2", "page 3"]
    );
}

#[tokio::test]
async fn test_collect_zero_pages_only_probes() {
    let source = FakePages::new(Vec::new());

    let records = collect_pages(&source).await.unwrap();

    assert!(records.is_empty());
    assert_eq!(source.calls(), vec!["metadata"]);
}

#[tokio::test]
async fn test_collect_null_page_contributes_nothing() {
    let source = FakePages::new(vec![Some(vec![1]), None, Some(vec![]), Some(vec![2])]);

    let records = collect_pages(&source).await.unwrap();

    assert_eq!(records, vec![1, 2]);
    assert_eq!(source.calls().len(), 5);
}

#[tokio::test]
async fn test_collect_length_is_sum_of_pages() {
    for k in 0..6_u32 {
        let pages: Vec<Option<Vec<u32>>> = (0..k).map(|p| Some(vec![p; p as usize])).collect();
        let expected: usize = (0..k as usize).sum();
        let source = FakePages::new(pages);

        let records = collect_pages(&source).await.unwrap();

        assert_eq!(records.len(), expected);
        assert_eq!(source.calls().len(), k as usize + 1);
    }
}

#[tokio::test]
async fn test_collect_probe_failure_propagates() {
    let source = FakePages::with_metadata(Err(Error::config("unused")));

    let err = collect_pages(&source).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(source.calls(), vec!["metadata"]);
}

#[tokio::test]
async fn test_collect_negative_count_fails_fast() {
    let source = FakePages::with_metadata(Ok(PageMetadata::with_pages(-3)));

    let err = collect_pages(&source).await.unwrap_err();

    assert!(matches!(err, Error::PageMetadata { .. }));
    assert_eq!(source.calls(), vec!["metadata"]);
}

#[tokio::test]
async fn test_collect_page_failure_stops_collection() {
    let mut source = FakePages::new(vec![Some(vec![1]), Some(vec![2]), Some(vec![3])]);
    source.fail_on_page = Some(2);

    let err = collect_pages(&source).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(source.calls(), vec!["metadata", "page 1", "page 2"]);
}
