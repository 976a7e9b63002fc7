//! Page arithmetic
//!
//! Turns a total row count and a requested page into the offset used by the
//! follow-up `LIMIT offset,size` query, and carries the fetched rows back to
//! the caller as one serializable envelope.

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use type_mapping::Row;

/// A computed page of results
///
/// Serializes as `{"limitPages", "total", "pages", "offset", "currentPage", "data"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    limit_pages: u64,
    total: u64,
    pages: u64,
    offset: u64,
    current_page: u64,
    data: Vec<Row>,
}

fn clamp_requested(current_page: i64) -> u64 {
    u64::try_from(current_page).unwrap_or(0).max(1)
}

impl Pagination {
    /// Create an uncalculated page; call [`Pagination::calculate`] before reading offsets
    pub fn new(total: u64, current_page: i64, limit_pages: u64) -> Self {
        Self {
            limit_pages,
            total,
            pages: 1,
            offset: 0,
            current_page: clamp_requested(current_page),
            data: Vec::new(),
        }
    }

    /// Create and calculate in one step
    pub fn compute(total: u64, current_page: i64, limit_pages: u64) -> Result<Self, QueryError> {
        let mut pagination = Self::new(total, current_page, limit_pages);
        pagination.calculate()?;
        Ok(pagination)
    }

    /// The envelope returned when pagination was requested without a limit
    pub fn empty(limit_pages: u64) -> Self {
        Self::new(0, 1, limit_pages)
    }

    pub fn ensure_page_size(limit_pages: u64) -> Result<(), QueryError> {
        if limit_pages == 0 {
            return Err(QueryError::InvalidPagination(
                "page size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Derive page count and offset; the current page is clamped into `[1, pages]`
    pub fn calculate(&mut self) -> Result<&mut Self, QueryError> {
        Self::ensure_page_size(self.limit_pages)?;

        self.pages = if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.limit_pages)
        };
        self.current_page = self.current_page.clamp(1, self.pages);
        self.offset = self.limit_pages * (self.current_page - 1);

        Ok(self)
    }

    /// `offset,size` for a MySQL `LIMIT` clause
    pub fn limit_fragment(&self) -> String {
        format!("{},{}", self.offset, self.limit_pages)
    }

    pub fn set_limit_pages(&mut self, limit_pages: u64) -> &mut Self {
        self.limit_pages = limit_pages;
        self
    }

    pub fn set_totals(&mut self, total: u64) -> &mut Self {
        self.total = total;
        self
    }

    pub fn set_pages(&mut self, pages: u64) -> &mut Self {
        self.pages = pages;
        self
    }

    /// Values below 1 become 1
    pub fn set_current_page(&mut self, current_page: i64) -> &mut Self {
        self.current_page = clamp_requested(current_page);
        self
    }

    pub fn set_data(&mut self, data: Vec<Row>) -> &mut Self {
        self.data = data;
        self
    }

    pub fn limit_pages(&self) -> u64 {
        self.limit_pages
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn pages(&self) -> u64 {
        self.pages
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn data(&self) -> &[Row] {
        &self.data
    }

    pub fn into_data(self) -> Vec<Row> {
        self.data
    }
}
