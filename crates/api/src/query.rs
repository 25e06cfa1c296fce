//! Query-string readers for list endpoints.
//!
//! Every parameter arrives as an optional raw string. The readers parse it,
//! record a field error on the shared [`Validator`] when it is malformed, and
//! fall back to a default so validation can keep collecting errors. An empty
//! value counts as absent.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use songbook_core::pagination::{Filters, SortSafelist};
use songbook_core::types::{DbId, Timestamp};
use songbook_core::validator::Validator;

/// `?page=&page_size=&sort=`, shared by all list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

impl PageParams {
    /// Build [`Filters`] for `safelist`, recording unparseable numbers.
    ///
    /// Range and safelist checks are left to
    /// [`validate_filters`](songbook_core::pagination::validate_filters).
    pub fn into_filters(self, v: &mut Validator, safelist: &'static SortSafelist) -> Filters {
        let mut filters = Filters::new(safelist);
        if let Some(page) = read_int(v, "page", self.page) {
            filters.page = page;
        }
        if let Some(page_size) = read_int(v, "page_size", self.page_size) {
            filters.page_size = page_size;
        }
        if let Some(sort) = read_string(self.sort) {
            filters.sort = sort;
        }
        filters
    }
}

/// Trimmed, non-empty value of a text parameter.
pub fn read_string(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn read_int(v: &mut Validator, key: &str, raw: Option<String>) -> Option<i64> {
    let raw = read_string(raw)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            v.add_error(key, "must be an integer value");
            None
        }
    }
}

pub fn read_id(v: &mut Validator, key: &str, raw: Option<String>) -> Option<DbId> {
    let id = read_int(v, key, raw)?;
    if id < 1 {
        v.add_error(key, "must be a positive integer");
        return None;
    }
    Some(id)
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn read_date(v: &mut Validator, key: &str, raw: Option<String>) -> Option<NaiveDate> {
    let raw = read_string(raw)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            v.add_error(key, "must be a date in YYYY-MM-DD format");
            None
        }
    }
}

/// RFC 3339 instant, e.g. `2025-06-01T18:00:00Z`.
pub fn read_timestamp(v: &mut Validator, key: &str, raw: Option<String>) -> Option<Timestamp> {
    let raw = read_string(raw)?;
    match chrono::DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(_) => {
            v.add_error(key, "must be an RFC 3339 timestamp");
            None
        }
    }
}
