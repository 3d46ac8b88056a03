//! Paginated table access
//!
//! The scanner only needs one primitive from a store: fetch the page that
//! starts at a cursor. The cursor is opaque to everything but the backend and
//! is handed back to the caller with each page, so pagination state lives in
//! the scan loop rather than in the store.

pub mod dynamo;
pub mod memory;

use crate::error::StoreResult;
use crate::record::RawRecord;
use async_trait::async_trait;

pub use dynamo::DynamoTable;
pub use memory::MemoryTable;

/// One page of scan results
#[derive(Debug, Clone)]
pub struct ScanPage<C> {
    pub rows: Vec<RawRecord>,
    /// `None` once the table is exhausted
    pub next_cursor: Option<C>,
}

/// A table that can be scanned page by page
#[async_trait]
pub trait TableScan: Send + Sync + 'static {
    /// Opaque position marker for the next page
    type Cursor: Send + 'static;

    /// Name used in logs and errors
    fn table_name(&self) -> &str;

    /// Fetch up to `limit` rows starting at `cursor` (`None` = start of table).
    /// A `None` limit lets the store pick its default page size.
    async fn scan_page(
        &self,
        cursor: Option<Self::Cursor>,
        limit: Option<i32>,
    ) -> StoreResult<ScanPage<Self::Cursor>>;
}
