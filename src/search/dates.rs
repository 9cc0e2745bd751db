//! Listing and report date ranges

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Timestamp layout the search index stores dates in
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Inclusive timestamp bounds for a date-bounded search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Lower bound
    pub from: NaiveDateTime,
    /// Upper bound
    pub to: NaiveDateTime,
}

impl DateRange {
    /// Build a range from two ISO calendar dates (`YYYY-MM-DD`)
    ///
    /// A single-day range covers the whole day, ending at `23:59:59`.
    /// Otherwise both bounds fall at midnight.
    pub fn from_dates(from: &str, to: &str) -> Result<Self> {
        let start = parse_date(from)?;
        let end = parse_date(to)?;

        let to = if start == end {
            start.and_time(end_of_day())
        } else {
            end.and_time(NaiveTime::MIN)
        };

        Ok(Self {
            from: start.and_time(NaiveTime::MIN),
            to,
        })
    }

    /// Lower bound in index format
    pub fn lower_bound(&self) -> String {
        self.from.format(DATE_TIME_FORMAT).to_string()
    }

    /// Upper bound in index format
    pub fn upper_bound(&self) -> String {
        self.to.format(DATE_TIME_FORMAT).to_string()
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::invalid_date(value, e.to_string()))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
