//! Data store locators
//!
//! Every endpoint the client talks to hangs off one base URL:
//!
//! ```text
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/event-triggers/{event}/token
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/cases
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/cases/{cid}
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/cases/{cid}/event-triggers/{event}/token
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/cases/{cid}/events
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/cases/pagination_metadata
//! /caseworkers/{uid}/jurisdictions/{jid}/case-types/{ctid}/cases?page={n}
//! /searchCases?ctid={ctid}
//! ```

use crate::error::Result;
use url::Url;

/// Identifies a bulk resource: the cases of one case type in one jurisdiction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTypeLocator {
    /// Caseworker id the request is made for
    pub user_id: String,
    /// Jurisdiction id
    pub jurisdiction: String,
    /// Case type id
    pub case_type: String,
}

impl CaseTypeLocator {
    /// Create a locator
    pub fn new(
        user_id: impl Into<String>,
        jurisdiction: impl Into<String>,
        case_type: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            jurisdiction: jurisdiction.into(),
            case_type: case_type.into(),
        }
    }
}

/// Builds data store URLs
#[derive(Debug, Clone)]
pub struct DataStoreUrls {
    base_url: Url,
}

impl DataStoreUrls {
    /// Create a builder rooted at `base_url`
    pub fn new(base_url: &Url) -> Self {
        Self {
            base_url: base_url.clone(),
        }
    }

    /// Parse the base URL and create a builder
    pub fn parse(base_url: &str) -> Result<Self> {
        Ok(Self::new(&Url::parse(base_url)?))
    }

    /// Root the builder was created with
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Token endpoint for starting a case creation event
    pub fn start_case_creation(&self, locator: &CaseTypeLocator, event_id: &str) -> Result<Url> {
        self.case_type_url(locator, &["event-triggers", event_id, "token"])
    }

    /// Case creation submission endpoint
    pub fn submit_case_creation(&self, locator: &CaseTypeLocator) -> Result<Url> {
        self.case_type_url(locator, &["cases"])
    }

    /// Single case retrieval endpoint
    pub fn retrieve_case(&self, locator: &CaseTypeLocator, case_id: &str) -> Result<Url> {
        self.case_type_url(locator, &["cases", case_id])
    }

    /// Token endpoint for starting an event on an existing case
    pub fn start_event_for_case(
        &self,
        locator: &CaseTypeLocator,
        case_id: &str,
        event_id: &str,
    ) -> Result<Url> {
        self.case_type_url(locator, &["cases", case_id, "event-triggers", event_id, "token"])
    }

    /// Event submission endpoint for an existing case
    pub fn submit_event_for_case(&self, locator: &CaseTypeLocator, case_id: &str) -> Result<Url> {
        self.case_type_url(locator, &["cases", case_id, "events"])
    }

    /// Page count probe for a bulk resource
    pub fn pagination_metadata(&self, locator: &CaseTypeLocator) -> Result<Url> {
        self.case_type_url(locator, &["cases", "pagination_metadata"])
    }

    /// One page of a bulk resource (pages start at 1)
    pub fn retrieve_cases_page(&self, locator: &CaseTypeLocator, page: u32) -> Result<Url> {
        let mut url = self.case_type_url(locator, &["cases"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Search endpoint for a case type
    pub fn search(&self, case_type: &str) -> Result<Url> {
        let mut url = join_path(&self.base_url, "searchCases")?;
        url.query_pairs_mut().append_pair("ctid", case_type);
        Ok(url)
    }

    fn case_type_url(&self, locator: &CaseTypeLocator, tail: &[&str]) -> Result<Url> {
        let mut segments = vec![
            "caseworkers",
            locator.user_id.as_str(),
            "jurisdictions",
            locator.jurisdiction.as_str(),
            "case-types",
            locator.case_type.as_str(),
        ];
        segments.extend_from_slice(tail);
        append_segments(&self.base_url, &segments)
    }
}

/// Append one path segment to `base`, keeping any path prefix it already has
pub(crate) fn join_path(base: &Url, segment: &str) -> Result<Url> {
    append_segments(base, &[segment])
}

fn append_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
