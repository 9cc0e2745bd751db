//! Data transfer objects exchanged with the case data store
//!
//! Case payloads are kept as raw JSON; only the envelope fields the client
//! needs to reason about (ids, references, counts, event tokens) are typed.

use crate::types::JsonValue;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Case records
// ============================================================================

/// A case as returned by page fetches and searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitEvent {
    /// Data store case id
    #[serde(rename = "id")]
    pub case_id: i64,
    /// Workflow state
    #[serde(default)]
    pub state: Option<String>,
    /// Case payload
    #[serde(default)]
    pub case_data: JsonValue,
}

/// A multiple (group of cases) as returned by searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitMultipleEvent {
    /// Data store case id of the multiple
    #[serde(rename = "id")]
    pub case_id: i64,
    /// Workflow state
    #[serde(default)]
    pub state: Option<String>,
    /// Multiple payload
    #[serde(default)]
    pub case_data: JsonValue,
}

/// Exposes the business reference of a record for diff reporting
pub trait CaseReference {
    /// The record's reference, if the payload carries one
    fn case_reference(&self) -> Option<&str>;
}

impl CaseReference for SubmitEvent {
    fn case_reference(&self) -> Option<&str> {
        self.case_data.get("ethosCaseReference")?.as_str()
    }
}

impl CaseReference for SubmitMultipleEvent {
    fn case_reference(&self) -> Option<&str> {
        self.case_data.get("multipleReference")?.as_str()
    }
}

// ============================================================================
// Search
// ============================================================================

/// Response of the search endpoint
///
/// `total` is the index's own match count and may exceed `cases.len()` when
/// the backend caps the page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    /// Index-reported match count
    pub total: u64,
    /// Matching records, empty when the index sends none or `null`
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_empty",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub cases: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> SearchResult<T> {
    /// Create a search result
    pub fn new(total: u64, cases: Vec<T>) -> Self {
        Self { total, cases }
    }
}

/// A value with an index-reported cardinality
pub trait Counted {
    /// The reported cardinality
    fn total(&self) -> u64;
}

impl<T> Counted for SearchResult<T> {
    fn total(&self) -> u64 {
        self.total
    }
}

// ============================================================================
// Events (writes)
// ============================================================================

/// Response of an event-trigger start call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartEventResponse {
    /// Token that must accompany the submission
    pub token: String,
    /// Event being started
    pub event_id: String,
    /// Current case details, absent for case creation
    #[serde(default)]
    pub case_details: Option<JsonValue>,
}

/// Event description inside a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Event id
    pub id: String,
    /// Short summary
    pub summary: String,
    /// Longer description
    #[serde(default)]
    pub description: String,
}

/// Body of a case or event submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDataContent {
    /// Event being submitted
    pub event: EventDescriptor,
    /// Case payload
    pub data: JsonValue,
    /// Token obtained from the start call
    pub event_token: String,
    /// Whether data store warnings are ignored
    pub ignore_warning: bool,
}

/// Summary used for automatically created cases
pub const CREATION_EVENT_SUMMARY: &str = "Case created automatically";

/// Summary used for cases updated by a bulk job
pub const UPDATE_EVENT_SUMMARY: &str = "Case updated by bulk";

/// Summary used for multiples updated by a bulk job
pub const UPDATE_BULK_EVENT_SUMMARY: &str = "Bulk case updated by bulk";

impl CaseDataContent {
    /// Wrap case data in a submission envelope for a started event
    pub fn for_event(start: &StartEventResponse, data: JsonValue, summary: &str) -> Self {
        Self {
            event: EventDescriptor {
                id: start.event_id.clone(),
                summary: summary.to_string(),
                description: String::new(),
            },
            data,
            event_token: start.token.clone(),
            ignore_warning: false,
        }
    }
}
