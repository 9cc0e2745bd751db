//! Search module
//!
//! Builds the opaque query payloads posted to the search endpoint.
//!
//! # Overview
//!
//! Every builder returns a [`SearchQuery`] capped at [`MAX_SEARCH_SIZE`]
//! hits. Date-bounded queries take a [`DateRange`], which turns a pair of
//! calendar dates into the timestamp bounds the index expects.

mod dates;
mod query;

pub use dates::{DateRange, DATE_TIME_FORMAT};
pub use query::{report_date_field, SearchQuery, ALL_VENUES, MAX_SEARCH_SIZE};
