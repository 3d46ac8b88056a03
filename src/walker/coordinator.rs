//! Scan coordinator - wires the producer to the reconciler
//!
//! The producer runs as a spawned task; the reconciler runs on the caller's
//! task. Once the reconciler has seen both channels close, the producer task
//! is joined for its completion reason.

use super::producer::{scan_table, ScanOptions};
use super::reconciler::Reconciler;
use super::stats::{ScanCompletion, ScanCounters, ScanTally};
use crate::error::{Result, WalkerError};
use crate::record::{CollectionsIndex, UsersIndex};
use crate::store::TableScan;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Everything a finished scan produced
#[derive(Debug)]
pub struct ScanReport {
    pub users: UsersIndex,
    pub collections: CollectionsIndex,
    pub tally: ScanTally,
    pub completion: ScanCompletion,
    pub duration: Duration,
}

impl ScanReport {
    /// True when the whole table was read
    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }
}

/// Runs one full-table scan and reconciliation
pub struct ScanCoordinator<S: TableScan> {
    store: Arc<S>,
    options: ScanOptions,
    shutdown: Arc<AtomicBool>,
    counters: Arc<ScanCounters>,
}

impl<S: TableScan> ScanCoordinator<S> {
    pub fn new(store: S, options: ScanOptions) -> Self {
        Self::with_shared_store(Arc::new(store), options)
    }

    /// Build from a store the caller keeps a handle to
    pub fn with_shared_store(store: Arc<S>, options: ScanOptions) -> Self {
        Self {
            store,
            options,
            shutdown: Arc::new(AtomicBool::new(false)),
            counters: Arc::new(ScanCounters::default()),
        }
    }

    /// Get shutdown flag for signal handlers
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Live counters, for progress display
    pub fn counters(&self) -> Arc<ScanCounters> {
        Arc::clone(&self.counters)
    }

    /// Scan the table to the end (or first error) and build both indexes
    pub async fn run(self) -> Result<ScanReport> {
        let start_time = Instant::now();

        let streams = scan_table(
            Arc::clone(&self.store),
            self.options,
            Arc::clone(&self.counters),
            Arc::clone(&self.shutdown),
        );

        let reconciled = Reconciler::new(Arc::clone(&self.counters))
            .run(streams.collections, streams.recipes)
            .await;

        let completion = streams
            .handle
            .await
            .map_err(|e| WalkerError::TaskFailed(e.to_string()))?;

        let tally = self.counters.snapshot();
        let duration = start_time.elapsed();

        info!(
            table = %self.store.table_name(),
            completion = %completion,
            pages = tally.pages,
            scanned = tally.scanned,
            users = reconciled.users.len(),
            collections = reconciled.collections.len(),
            dropped = tally.dropped(),
            interrupted = self.shutdown.load(Ordering::Relaxed),
            duration_ms = duration.as_millis() as u64,
            "Reconciliation finished"
        );

        Ok(ScanReport {
            users: reconciled.users,
            collections: reconciled.collections,
            tally,
            completion,
            duration,
        })
    }
}
