//! Filter parameters, sort safelist resolution, and pagination metadata.
//!
//! List endpoints accept a client-chosen sort token. The token is checked
//! against a hardcoded per-endpoint [`SortSafelist`] by [`validate_filters`],
//! and only the column name and direction resolved from that safelist are
//! ever spliced into SQL. Every other list input is a bound parameter.

use serde::Serialize;

use crate::validator::Validator;

// ---------------------------------------------------------------------------
// Defaults and limits
// ---------------------------------------------------------------------------

/// Page number used when the client does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Largest accepted page number.
pub const MAX_PAGE: i64 = 10_000_000;

/// Sort token used when the client does not supply one (newest first).
pub const DEFAULT_SORT: &str = "-created_at";

// ---------------------------------------------------------------------------
// Sort safelist
// ---------------------------------------------------------------------------

/// A client-facing sort token and the trusted SQL column it resolves to.
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub token: &'static str,
    pub column: &'static str,
}

/// Hardcoded set of sort keys an endpoint accepts.
///
/// Each key may be requested ascending (`title`) or descending (`-title`).
#[derive(Debug)]
pub struct SortSafelist {
    keys: &'static [SortKey],
}

impl SortSafelist {
    pub const fn new(keys: &'static [SortKey]) -> Self {
        Self { keys }
    }

    /// Resolve a sort token (with or without a leading `-`) to its column.
    pub fn column_for(&self, sort: &str) -> Option<&'static str> {
        let token = sort.strip_prefix('-').unwrap_or(sort);
        self.keys
            .iter()
            .find(|key| key.token == token)
            .map(|key| key.column)
    }

    pub fn accepts(&self, sort: &str) -> bool {
        self.column_for(sort).is_some()
    }

    /// Every accepted token, ascending forms first.
    pub fn tokens(&self) -> Vec<String> {
        let ascending = self.keys.iter().map(|key| key.token.to_string());
        let descending = self.keys.iter().map(|key| format!("-{}", key.token));
        ascending.chain(descending).collect()
    }
}

/// Sort direction of a resolved [`SortClause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A safelisted column and direction, ready for an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortClause {
    /// Render as `<column> <ASC|DESC>`.
    pub fn to_sql(self) -> String {
        format!("{} {}", self.column, self.direction.as_sql())
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Validated page, page size, and sort parameters for one list request.
#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub safelist: &'static SortSafelist,
}

impl Filters {
    /// Filters with default paging and sort for the given safelist.
    pub fn new(safelist: &'static SortSafelist) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            safelist,
        }
    }

    /// Resolve the sort token into a trusted column and direction.
    ///
    /// # Panics
    ///
    /// Panics when the sort token is not in the safelist. [`validate_filters`]
    /// must have rejected such input before a query is built; reaching this
    /// point with an unknown token is a programming error, and no fallback
    /// column is ever substituted.
    pub fn sort_clause(&self) -> SortClause {
        let Some(column) = self.safelist.column_for(&self.sort) else {
            panic!("unsafe sort parameter: {:?}", self.sort);
        };
        let direction = if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        SortClause { column, direction }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Check page, page size, and sort token, recording every failure.
pub fn validate_filters(v: &mut Validator, filters: &Filters) {
    v.check(filters.page > 0, "page", "must be greater than zero");
    v.check(
        filters.page <= MAX_PAGE,
        "page",
        format!("must be a maximum of {MAX_PAGE}"),
    );
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        format!("must be a maximum of {MAX_PAGE_SIZE}"),
    );
    v.check(
        filters.safelist.accepts(&filters.sort),
        "sort",
        format!(
            "invalid sort value, must be one of: {}",
            filters.safelist.tokens().join(", ")
        ),
    );
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Pagination metadata returned alongside every list response.
///
/// An all-zero value means the query matched nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_records: i64,
}

/// Derive page metadata from the window count of a list query.
pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records <= 0 || page_size <= 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        total_pages: (total_records + page_size - 1) / page_size,
        total_records,
    }
}
