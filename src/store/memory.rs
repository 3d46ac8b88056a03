//! In-memory table with failure injection
//!
//! Serves rows from a `Vec` in fixed-size pages. The cursor is the offset of
//! the next row. Records every request so tests can assert on pagination.

use super::{ScanPage, TableScan};
use crate::error::{StoreError, StoreResult};
use crate::record::RawRecord;
use async_trait::async_trait;
use std::sync::Mutex;

/// Page size used when the caller passes no limit
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Record of one `scan_page` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<usize>,
    pub limit: Option<i32>,
}

/// In-memory [`TableScan`] backend
#[derive(Debug)]
pub struct MemoryTable {
    name: String,
    rows: Vec<RawRecord>,
    page_size: usize,
    /// Zero-based request index that fails, with the error reason
    fail_on_request: Option<(usize, String)>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>, rows: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
            page_size: DEFAULT_PAGE_SIZE,
            fail_on_request: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Default page size when no limit is given
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make the `index`-th request (zero-based) fail with `reason`
    pub fn fail_on_request(mut self, index: usize, reason: impl Into<String>) -> Self {
        self.fail_on_request = Some((index, reason.into()));
        self
    }

    /// All requests served so far, in order
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TableScan for MemoryTable {
    type Cursor = usize;

    fn table_name(&self) -> &str {
        &self.name
    }

    async fn scan_page(
        &self,
        cursor: Option<usize>,
        limit: Option<i32>,
    ) -> StoreResult<ScanPage<usize>> {
        let index = {
            let mut requests = self.requests.lock().map_err(|_| StoreError::ScanFailed {
                table: self.name.clone(),
                reason: "request log poisoned".to_string(),
            })?;
            requests.push(PageRequest { cursor, limit });
            requests.len() - 1
        };

        if let Some((fail_index, ref reason)) = self.fail_on_request {
            if index == fail_index {
                return Err(StoreError::ScanFailed {
                    table: self.name.clone(),
                    reason: reason.clone(),
                });
            }
        }

        let page_size = match limit {
            Some(n) if n > 0 => n as usize,
            _ => self.page_size,
        };
        let start = cursor.unwrap_or(0).min(self.rows.len());
        let end = start.saturating_add(page_size).min(self.rows.len());

        Ok(ScanPage {
            rows: self.rows[start..end].to_vec(),
            next_cursor: (end < self.rows.len()).then_some(end),
        })
    }
}
