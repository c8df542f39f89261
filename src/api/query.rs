//! Canonical list-query encoding shared by every catalogue listing.
//!
//! Listing endpoints accept `skip`, `limit`, free-text/boolean filter fields,
//! and a `sort` parameter of comma-joined signed tokens. This module owns the
//! translation from page numbers, filter values, and ordered sort columns
//! into those exact wire parameters.

use std::fmt;
use std::str::FromStr;

use super::error::ApiError;

/// Fixed page size for every catalogue listing.
///
/// The page size is a UI constant, never a user-supplied override.
pub const PAGE_SIZE: u64 = 10;

/// Computes the `skip` offset for a 1-based page number.
#[must_use]
pub const fn skip_for_page(page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(PAGE_SIZE)
}

/// Direction of a single sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order, encoded as `+`.
    Ascending,
    /// Descending order, encoded as `-`.
    #[default]
    Descending,
    /// Sort cleared by the user but the column still reported.
    ///
    /// Encoded as `-`, identically to [`SortDirection::Descending`]. The
    /// upstream contract does not distinguish "no explicit order" from
    /// "descending"; the collapse is preserved deliberately.
    Cleared,
}

impl SortDirection {
    /// Returns the sign character used in the wire encoding.
    #[must_use]
    pub const fn sign(self) -> char {
        match self {
            Self::Ascending => '+',
            Self::Descending | Self::Cleared => '-',
        }
    }
}

/// One sort column with its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column name as the service knows it.
    pub field: String,
    /// Requested direction.
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates a sort key.
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl FromStr for SortKey {
    type Err = ApiError;

    /// Parses a user-facing token: `+title`, `-created_at`, or bare `title`
    /// (ascending).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        let (direction, field) = match trimmed.strip_prefix('+') {
            Some(rest) => (SortDirection::Ascending, rest),
            None => match trimmed.strip_prefix('-') {
                Some(rest) => (SortDirection::Descending, rest),
                None => (SortDirection::Ascending, trimmed),
            },
        };
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ApiError::InvalidSort {
                token: trimmed.to_owned(),
            });
        }
        Ok(Self::new(field, direction))
    }
}

/// Ordered multi-column sort specification.
///
/// The order of keys reflects the order the user applied them, not any
/// lexical order; the wire encoding preserves it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Creates an empty sort specification.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Appends a sort column, preserving application order.
    pub fn push(&mut self, key: SortKey) {
        self.keys.push(key);
    }

    /// Returns true when no sort column is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the ordered sort keys.
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Encodes the specification as comma-joined `sign + field` tokens.
    ///
    /// Returns `None` when no sort is active so the parameter can be omitted
    /// from the query string entirely.
    #[must_use]
    pub fn encode(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let tokens: Vec<String> = self
            .keys
            .iter()
            .map(|key| format!("{}{}", key.direction.sign(), key.field))
            .collect();
        Some(tokens.join(","))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode().unwrap_or_default())
    }
}

impl FromIterator<SortKey> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// A single filter value: free text or a boolean toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Substring/text filter.
    Text(String),
    /// Boolean filter (e.g. `is_superuser`).
    Flag(bool),
}

impl FilterValue {
    /// Renders the value as it appears in the query string.
    #[must_use]
    pub fn as_query_value(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

/// Complete parameter set for one list request.
///
/// Field order is preserved: filters appear in the order they were added and
/// the encoded output is deterministic for identical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    skip: u64,
    limit: u64,
    filters: Vec<(String, FilterValue)>,
    sort: SortSpec,
}

impl ListQuery {
    /// Creates a query for a 1-based page number with the fixed page size.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPagination`] when `page` is zero.
    pub fn for_page(page: u64) -> Result<Self, ApiError> {
        if page == 0 {
            return Err(ApiError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            skip: skip_for_page(page),
            limit: PAGE_SIZE,
            filters: Vec::new(),
            sort: SortSpec::new(),
        })
    }

    /// Adds a text filter field. Empty values are dropped, matching the
    /// behaviour of a cleared search input.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let text = value.into();
        if !text.is_empty() {
            self.filters.push((field.into(), FilterValue::Text(text)));
        }
        self
    }

    /// Adds a boolean filter field.
    #[must_use]
    pub fn with_flag(mut self, field: impl Into<String>, value: bool) -> Self {
        self.filters.push((field.into(), FilterValue::Flag(value)));
        self
    }

    /// Copies the filter set from another query, e.g. when paging within an
    /// unchanged search.
    #[must_use]
    pub fn with_filters_from(mut self, other: &Self) -> Self {
        self.filters = other.filters.clone();
        self
    }

    /// Replaces the sort specification.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the `skip` offset.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// Returns the `limit` (always the fixed page size).
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the active filters in insertion order.
    #[must_use]
    pub fn filters(&self) -> &[(String, FilterValue)] {
        &self.filters
    }

    /// Returns the sort specification.
    #[must_use]
    pub const fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Produces the exact query-string pairs for the list request.
    ///
    /// `skip` and `limit` always come first, then filters in insertion
    /// order, then `sort` when at least one column is active.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("skip".to_owned(), self.skip.to_string()),
            ("limit".to_owned(), self.limit.to_string()),
        ];
        for (field, value) in &self.filters {
            pairs.push((field.clone(), value.as_query_value()));
        }
        if let Some(encoded) = self.sort.encode() {
            pairs.push(("sort".to_owned(), encoded));
        }
        pairs
    }
}
