//! Offset pagination.

use thiserror::Error;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("skip must not be negative")]
    NegativeSkip,

    #[error("limit must be between 1 and 100")]
    LimitOutOfRange,
}

/// A validated `skip`/`limit` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    skip: i64,
    limit: i64,
}

impl Pagination {
    /// Build a window, applying defaults for absent values.
    ///
    /// # Errors
    ///
    /// Returns an error if `skip` is negative or `limit` is outside `1..=100`.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, PaginationError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if skip < 0 {
            return Err(PaginationError::NegativeSkip);
        }

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::LimitOutOfRange);
        }

        Ok(Self { skip, limit })
    }

    #[must_use]
    pub const fn skip(&self) -> i64 {
        self.skip
    }

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(Pagination::new(None, None), Ok(Pagination::default()));
    }

    #[test]
    fn bounds_are_enforced() {
        assert_eq!(
            Pagination::new(Some(-1), None),
            Err(PaginationError::NegativeSkip)
        );
        assert_eq!(
            Pagination::new(None, Some(0)),
            Err(PaginationError::LimitOutOfRange)
        );
        assert_eq!(
            Pagination::new(None, Some(101)),
            Err(PaginationError::LimitOutOfRange)
        );

        let page = Pagination::new(Some(20), Some(100));

        assert_eq!(page.map(|page| (page.skip(), page.limit())), Ok((20, 100)));
    }
}
