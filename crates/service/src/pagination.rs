//! Pagination utilities for list endpoints
//!
//! Raw `page`/`limit` query strings are parsed into a `Pagination`; results
//! come back as a `Page<T>` carrying the echoed parameters and the total.

use serde::Serialize;

use crate::errors::ServiceError;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub limit: u64,
}

impl Pagination {
    /// Parse query values. Absent or empty means default; anything that is not
    /// an integer >= 1 is rejected. `limit` is capped at `MAX_LIMIT`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Result<Self, ServiceError> {
        let page = parse_positive("page", page)?.unwrap_or(1);
        let limit = parse_positive("limit", limit)?.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        Ok(Self { page, limit })
    }

    /// 0-based page index for `Paginator::fetch_page`.
    pub fn page_index(self) -> u64 { self.page - 1 }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, limit: DEFAULT_LIMIT } }
}

fn parse_positive(name: &str, raw: Option<&str>) -> Result<Option<u64>, ServiceError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else { return Ok(None) };
    match raw.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(ServiceError::Validation(format!("Query parameter \"{name}\" must be a positive integer"))),
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, p: Pagination) -> Self {
        Self { items, total, page: p.page, limit: p.limit }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), total: self.total, page: self.page, limit: self.limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent_or_empty() {
        assert_eq!(Pagination::from_query(None, None).unwrap(), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::from_query(Some(""), Some(" ")).unwrap(), Pagination::default());
    }

    #[test]
    fn limit_is_capped() {
        let p = Pagination::from_query(Some("3"), Some("1000")).unwrap();
        assert_eq!(p, Pagination { page: 3, limit: 100 });
        assert_eq!(p.page_index(), 2);
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for bad in ["0", "-1", "abc", "1.5"] {
            let err = Pagination::from_query(Some(bad), None).unwrap_err();
            assert_eq!(err.to_string(), "Query parameter \"page\" must be a positive integer");
        }
        let err = Pagination::from_query(None, Some("x")).unwrap_err();
        assert_eq!(err.to_string(), "Query parameter \"limit\" must be a positive integer");
    }
}
