use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary statistic computed over the filtered, unpaginated set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aggregate {
    /// Row counts keyed by a column value, e.g. status → count.
    Counts(BTreeMap<String, u64>),
    /// Sum over a numeric column.
    Sum(i64),
}

impl Aggregate {
    pub fn counts(&self) -> Option<&BTreeMap<String, u64>> {
        match self {
            Aggregate::Counts(c) => Some(c),
            Aggregate::Sum(_) => None,
        }
    }

    pub fn sum(&self) -> Option<i64> {
        match self {
            Aggregate::Sum(s) => Some(*s),
            Aggregate::Counts(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    #[serde(default)]
    pub aggregates: BTreeMap<String, Aggregate>,
}

impl<T> ListResult<T> {
    pub fn new(rows: Vec<T>, total_count: u64, page: u64, page_size: u64) -> Self {
        Self {
            rows,
            total_count,
            page,
            page_size,
            total_pages: crate::total_pages(total_count, page_size),
            aggregates: BTreeMap::new(),
        }
    }

    pub fn empty(page: u64, page_size: u64) -> Self {
        Self::new(Vec::new(), 0, page, page_size)
    }

    pub fn with_aggregate(mut self, name: impl Into<String>, value: Aggregate) -> Self {
        self.aggregates.insert(name.into(), value);
        self
    }

    pub fn aggregate(&self, name: &str) -> Option<&Aggregate> {
        self.aggregates.get(name)
    }

    /// Map rows while preserving counts and aggregates (domain → DTO mapping convenience)
    pub fn map_rows<U>(self, f: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            aggregates: self.aggregates,
        }
    }
}
