//! Missing-reference reporting
//!
//! After a poll over an explicit reference list, the client logs which
//! requested references the index did not return. The report is purely
//! informational and never changes what the caller receives.

use crate::models::CaseReference;
use std::collections::HashMap;
use tracing::info;

/// Requested references not matched by `found`
///
/// Each found reference cancels one requested occurrence, so duplicates in
/// the request are reported as often as they remain unmatched. Request order
/// is preserved.
pub fn missing_references<'a, I>(requested: &[String], found: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for reference in found {
        *remaining.entry(reference).or_default() += 1;
    }

    requested
        .iter()
        .filter(|reference| match remaining.get_mut(reference.as_str()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

/// Compute and log the references absent from `records`
pub fn report_missing<T: CaseReference>(requested: &[String], records: &[T]) -> Vec<String> {
    let missing = missing_references(
        requested,
        records.iter().filter_map(CaseReference::case_reference),
    );
    info!(
        requested = requested.len(),
        found = records.len(),
        missing = ?missing,
        "cases not found"
    );
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmitEvent;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn refs(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn case(reference: &str) -> SubmitEvent {
        SubmitEvent {
            case_id: 1,
            state: None,
            case_data: json!({"ethosCaseReference": reference}),
        }
    }

    #[test]
    fn test_nothing_missing() {
        let missing = missing_references(&refs(&["A", "B", "C"]), ["C", "A", "B"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_missing_in_request_order() {
        let missing = missing_references(&refs(&["C", "A", "B", "D"]), ["A"]);
        assert_eq!(missing, refs(&["C", "B", "D"]));
    }

    #[test]
    fn test_duplicates_cancel_once() {
        let missing = missing_references(&refs(&["A", "A", "B"]), ["A"]);
        assert_eq!(missing, refs(&["A", "B"]));
    }

    #[test]
    fn test_unrequested_results_are_ignored() {
        let missing = missing_references(&refs(&["A"]), ["Z", "A", "Y"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_report_missing_skips_records_without_reference() {
        let records = vec![
            case("A"),
            SubmitEvent {
                case_id: 2,
                state: None,
                case_data: json!({}),
            },
        ];
        let missing = report_missing(&refs(&["A", "B"]), &records);
        assert_eq!(missing, refs(&["B"]));
    }
}
