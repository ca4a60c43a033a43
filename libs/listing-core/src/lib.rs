//! Store-agnostic listing model: the request a listing page sends, the
//! ordering vocabulary, filter value normalization and the paged result.
//!
//! Compiling a [`ListQuery`] into SQL belongs to `listing-db`. This crate only
//! knows how untrusted request parameters become a normalized query.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod page;

pub use page::{Aggregate, ListResult};

/// Query-string key carrying the page number.
pub const PAGE_PARAM: &str = "page";
/// Query-string key carrying the page size.
pub const PAGE_SIZE_PARAM: &str = "page_size";
/// Query-string key carrying the sort key.
pub const SORT_PARAM: &str = "sort";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub dir: SortDir,
}

impl OrderKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Desc,
        }
    }
}

/// Ordered list of sort keys, most significant first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderBy(pub Vec<OrderKey>);

impl OrderBy {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append `tiebreaker` unless the order already mentions that field.
    /// An existing key keeps its direction.
    pub fn ensure_tiebreaker(mut self, tiebreaker: &str, dir: SortDir) -> Self {
        if !self.0.iter().any(|k| k.field == tiebreaker) {
            self.0.push(OrderKey {
                field: tiebreaker.to_string(),
                dir,
            });
        }
        self
    }

    /// Compact form used in logs: `-created_at,+id`.
    pub fn to_signed_tokens(&self) -> String {
        self.0
            .iter()
            .map(|k| match k.dir {
                SortDir::Asc => format!("+{}", k.field),
                SortDir::Desc => format!("-{}", k.field),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|k| format!("{} {}", k.field, k.dir.as_str()))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Page-size policy of a listing endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub default: u64,
    pub max: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: 20,
            max: 100,
        }
    }
}

impl PageLimits {
    /// Missing size uses the default; zero becomes 1; anything above `max` is capped.
    pub fn clamp(&self, requested: Option<u64>) -> u64 {
        let mut size = requested.unwrap_or(self.default);
        if size == 0 {
            size = 1;
        }
        size.min(self.max.max(1))
    }
}

/// Pages are 1-indexed; anything below 1 is treated as the first page.
pub fn normalize_page(page: i64) -> u64 {
    page.max(1) as u64
}

/// Parse a raw page parameter. Non-numeric input falls back to the first page.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(normalize_page)
        .unwrap_or(1)
}

/// Row offset of the first row on `page`.
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Number of pages needed for `total` rows. Zero rows means zero pages.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Immutable listing request, already normalized.
///
/// `owner_id` is the authenticated tenant; every compiled query is scoped to it.
/// `filters` holds raw filter values by name; which names are meaningful, and
/// how values are interpreted, is decided by the entity being listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub owner_id: Uuid,
    pub filters: BTreeMap<String, String>,
    pub sort: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

impl ListQuery {
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            page_size: PageLimits::default().default,
        }
    }

    /// Build a query from raw request parameters.
    ///
    /// `page`, `page_size` and `sort` are lifted out; every other parameter is
    /// kept as a candidate filter.
    pub fn from_params(owner_id: Uuid, params: &HashMap<String, String>, limits: PageLimits) -> Self {
        let page = parse_page(params.get(PAGE_PARAM).map(String::as_str));
        let requested_size = params
            .get(PAGE_SIZE_PARAM)
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|n| n.max(0) as u64);
        let sort = params
            .get(SORT_PARAM)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let filters = params
            .iter()
            .filter(|(k, _)| {
                !matches!(k.as_str(), PAGE_PARAM | PAGE_SIZE_PARAM | SORT_PARAM)
            })
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect();

        Self {
            owner_id,
            filters,
            sort,
            page,
            page_size: limits.clamp(requested_size),
        }
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = normalize_page(page);
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Raw filter value, `None` when absent or blank.
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.page_size)
    }
}

/* ---------- filter value normalization ---------- */

/// Canonical form of an enumerated value: trimmed and lowercased.
/// Returns `None` when blank or when `allowed` is given and does not contain it.
pub fn normalize_token(raw: &str, allowed: Option<&[&str]>) -> Option<String> {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }
    match allowed {
        Some(list) if !list.iter().any(|a| *a == token) => None,
        _ => Some(token),
    }
}

/// Search text: trimmed at both ends, inner whitespace kept so the term
/// matches literally. Blank means no search.
pub fn normalize_search(raw: &str) -> Option<String> {
    let term = raw.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}

/// Calendar date from `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

/// Resolve a requested sort key against the known keys (case-insensitive).
/// Anything unknown or missing resolves to `default`.
pub fn resolve_sort<'a>(requested: Option<&str>, known: &[&'a str], default: &'a str) -> &'a str {
    requested
        .map(|r| r.trim().to_ascii_lowercase())
        .and_then(|r| known.iter().copied().find(|k| k.eq_ignore_ascii_case(&r)))
        .unwrap_or(default)
}

/* ---------- errors ---------- */

/// Failures a listing can surface to its caller.
///
/// Unknown filters, unknown sort keys and out-of-range pages are not errors;
/// they are normalized away before a query is compiled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The store is reachable but the schema the listing needs is missing.
    #[error("listing storage is not provisioned: {0}")]
    NotProvisioned(String),

    /// The store could not be reached or failed while executing the query.
    #[error("listing storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, Error::NotProvisioned(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
