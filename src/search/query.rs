//! Search query payloads

use super::dates::DateRange;
use crate::types::JsonValue;
use serde::Serialize;
use serde_json::json;

/// Upper bound on hits returned by one search
pub const MAX_SEARCH_SIZE: u64 = 10_000;

/// Venue value meaning "do not filter by venue"
pub const ALL_VENUES: &str = "All";

const CASE_REFERENCE_FIELD: &str = "data.ethosCaseReference.keyword";
const MULTIPLE_REFERENCE_FIELD: &str = "data.multipleReference.keyword";
const LISTED_DATE_FIELD: &str = "data.hearingCollection.value.hearingDateCollection.value.listedDate";
const VENUE_FIELD_PREFIX: &str = "data.hearingCollection.value.hearingDateCollection.value";

const SCHEDULE_FIELDS: &[&str] = &[
    "data.ethosCaseReference",
    "data.claimant_Company",
    "data.claimantIndType.claimant_first_names",
    "data.claimantIndType.claimant_last_name",
    "data.claimantType.claimant_addressUK",
    "data.respondentCollection",
    "data.positionType",
];

const LABEL_FIELDS: &[&str] = &[
    "data.ethosCaseReference",
    "data.claimantIndType",
    "data.claimantType",
    "data.claimant_TypeOfClaimant",
    "data.claimant_Company",
    "data.representativeClaimantType",
    "data.claimantRepresentedQuestion",
    "data.respondentCollection",
    "data.repCollection",
];

/// Index field a report type filters its date range on
pub fn report_date_field(report_type: &str) -> &'static str {
    match report_type {
        "Claims Accepted" | "Live Caseload" => "data.preAcceptCase.dateAccepted",
        "Cases Completed" | "Time To First Hearing" => LISTED_DATE_FIELD,
        "Cases Awaiting Judgment" => "data.judgementCollection.value.dateJudgmentMade",
        _ => "data.receiptDate",
    }
}

/// Opaque query payload for the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(JsonValue);

impl SearchQuery {
    /// Wrap an arbitrary payload
    pub fn from_value(value: JsonValue) -> Self {
        Self(value)
    }

    /// The payload as JSON
    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Cases whose reference is one of `references`
    pub fn by_case_references(references: &[String]) -> Self {
        Self::bounded(terms(CASE_REFERENCE_FIELD, references), None)
    }

    /// Schedule projection of the cases matching `references`
    pub fn schedule_by_case_references(references: &[String]) -> Self {
        Self::bounded(terms(CASE_REFERENCE_FIELD, references), Some(SCHEDULE_FIELDS))
    }

    /// Address label projection of the cases matching `references`
    pub fn labels_by_case_references(references: &[String]) -> Self {
        Self::bounded(terms(CASE_REFERENCE_FIELD, references), Some(LABEL_FIELDS))
    }

    /// The multiple with the given reference
    pub fn by_multiple_reference(reference: &str) -> Self {
        Self::bounded(
            json!({ "bool": { "filter": [{ "term": { MULTIPLE_REFERENCE_FIELD: reference } }] } }),
            None,
        )
    }

    /// Cases listed for a hearing inside `range`
    ///
    /// `venue` of [`ALL_VENUES`] searches every venue; otherwise `venue_field`
    /// names the hearing field the venue is matched against.
    pub fn listing_date_range(range: &DateRange, venue: &str, venue_field: &str) -> Self {
        let mut filters = vec![date_range(LISTED_DATE_FIELD, range)];
        if venue != ALL_VENUES {
            let field = format!("{VENUE_FIELD_PREFIX}.{venue_field}.keyword");
            filters.push(json!({ "term": { field: venue } }));
        }
        Self::bounded(json!({ "bool": { "filter": filters } }), None)
    }

    /// Cases relevant to `report_type` inside `range`
    pub fn report_date_range(range: &DateRange, report_type: &str) -> Self {
        let filter = date_range(report_date_field(report_type), range);
        Self::bounded(json!({ "bool": { "filter": [filter] } }), None)
    }

    fn bounded(query: JsonValue, source: Option<&[&str]>) -> Self {
        let mut payload = json!({ "size": MAX_SEARCH_SIZE, "query": query });
        if let Some(fields) = source {
            payload["_source"] = json!(fields);
        }
        Self(payload)
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn terms(field: &str, values: &[String]) -> JsonValue {
    json!({ "terms": { field: values } })
}

fn date_range(field: &str, range: &DateRange) -> JsonValue {
    json!({
        "range": {
            field: { "gte": range.lower_bound(), "lte": range.upper_bound() }
        }
    })
}
