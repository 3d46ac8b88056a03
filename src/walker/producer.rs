//! Paginated scan producer
//!
//! A background task pages through the table, classifies every row and
//! pushes it onto one of two bounded channels. A full channel suspends the
//! task, which bounds memory when the reconciler falls behind. Both channels
//! close when the task returns, whatever the reason.

use super::stats::{ScanCompletion, ScanCounters};
use crate::record::{classify, Classified, CollectionRawRecord, RawRecord, RecipeRawRecord};
use crate::store::TableScan;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Default per-channel buffer, independent of page size
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

/// Producer tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Rows per page request; `None` uses the store default
    pub page_limit: Option<i32>,
    /// Buffer size of each output channel
    pub channel_capacity: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            page_limit: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Receiving ends of a running scan
#[derive(Debug)]
pub struct ScanStreams {
    pub collections: mpsc::Receiver<CollectionRawRecord>,
    pub recipes: mpsc::Receiver<RecipeRawRecord>,
    /// Resolves with the reason the scan stopped
    pub handle: JoinHandle<ScanCompletion>,
}

/// Start scanning `store` in the background and return immediately.
///
/// Must be called from within a tokio runtime.
pub fn scan_table<S: TableScan>(
    store: Arc<S>,
    options: ScanOptions,
    counters: Arc<ScanCounters>,
    shutdown: Arc<AtomicBool>,
) -> ScanStreams {
    let capacity = options.channel_capacity.max(1);
    let (collections_tx, collections_rx) = mpsc::channel(capacity);
    let (recipes_tx, recipes_rx) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        let producer = Producer {
            store,
            page_limit: options.page_limit,
            collections_tx,
            recipes_tx,
            counters,
            shutdown,
        };
        producer.run().await
    });

    ScanStreams {
        collections: collections_rx,
        recipes: recipes_rx,
        handle,
    }
}

struct Producer<S: TableScan> {
    store: Arc<S>,
    page_limit: Option<i32>,
    collections_tx: mpsc::Sender<CollectionRawRecord>,
    recipes_tx: mpsc::Sender<RecipeRawRecord>,
    counters: Arc<ScanCounters>,
    shutdown: Arc<AtomicBool>,
}

impl<S: TableScan> Producer<S> {
    /// Consumes the producer so the senders drop on every exit path
    async fn run(self) -> ScanCompletion {
        let table = self.store.table_name().to_string();
        info!(table = %table, limit = ?self.page_limit, "Starting table scan");

        let mut cursor: Option<S::Cursor> = None;
        let mut page: u64 = 0;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                warn!(table = %table, page, "Scan interrupted");
                return ScanCompletion::Interrupted;
            }

            let result = match self.store.scan_page(cursor.take(), self.page_limit).await {
                Ok(result) => result,
                Err(e) => {
                    error!(table = %table, page, error = %e, "Error scanning table");
                    return ScanCompletion::Failed {
                        page,
                        reason: e.to_string(),
                    };
                }
            };

            self.counters.record_page();
            debug!(page, rows = result.rows.len(), "Classifying page");

            for row in result.rows {
                if !self.dispatch(row).await {
                    warn!(table = %table, page, "Reconciler stopped receiving, ending scan");
                    return ScanCompletion::ConsumerClosed;
                }
            }

            match result.next_cursor {
                Some(next) => {
                    cursor = Some(next);
                    page += 1;
                }
                None => {
                    info!(
                        table = %table,
                        pages = page + 1,
                        rows = self.counters.snapshot().scanned,
                        "Table scan complete"
                    );
                    return ScanCompletion::Exhausted;
                }
            }
        }
    }

    /// Classify one row and send it on. Returns false if the receiver is gone.
    async fn dispatch(&self, row: RawRecord) -> bool {
        self.counters.record_scanned();

        match classify(row) {
            Classified::Collection(rec) => {
                self.counters.record_collection();
                self.collections_tx.send(rec).await.is_ok()
            }
            Classified::Recipe(rec) => {
                self.counters.record_recipe();
                self.recipes_tx.send(rec).await.is_ok()
            }
            Classified::Unrecognized(raw) => {
                self.counters.record_unrecognized();
                warn!(record = %raw, "Unable to classify record");
                true
            }
        }
    }
}
