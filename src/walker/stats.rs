//! Scan counters and completion reasons

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by the producer, the reconciler and the progress display
#[derive(Debug, Default)]
pub struct ScanCounters {
    pub pages: AtomicU64,
    pub scanned: AtomicU64,
    pub collections: AtomicU64,
    pub recipes: AtomicU64,
    pub unrecognized: AtomicU64,
    pub invalid_collections: AtomicU64,
    pub invalid_recipes: AtomicU64,
}

impl ScanCounters {
    pub fn record_page(&self) {
        self.pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scanned(&self) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_collection(&self) {
        self.collections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recipe(&self) {
        self.recipes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrecognized(&self) {
        self.unrecognized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_collection(&self) {
        self.invalid_collections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_recipe(&self) {
        self.invalid_recipes.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> ScanTally {
        ScanTally {
            pages: self.pages.load(Ordering::Relaxed),
            scanned: self.scanned.load(Ordering::Relaxed),
            collections: self.collections.load(Ordering::Relaxed),
            recipes: self.recipes.load(Ordering::Relaxed),
            unrecognized: self.unrecognized.load(Ordering::Relaxed),
            invalid_collections: self.invalid_collections.load(Ordering::Relaxed),
            invalid_recipes: self.invalid_recipes.load(Ordering::Relaxed),
        }
    }
}

/// Counts of what happened to every scanned row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTally {
    pub pages: u64,
    pub scanned: u64,
    /// Rows classified as collections
    pub collections: u64,
    /// Rows classified as saved recipes
    pub recipes: u64,
    pub unrecognized: u64,
    /// Collection rows dropped by the domain mapper
    pub invalid_collections: u64,
    /// Recipe rows dropped by the domain mapper
    pub invalid_recipes: u64,
}

impl ScanTally {
    /// Rows that never made it into an index
    pub fn dropped(&self) -> u64 {
        self.unrecognized + self.invalid_collections + self.invalid_recipes
    }
}

/// Why the producer stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCompletion {
    /// Store reported no further pages
    Exhausted,
    /// A page request failed; `page` is its zero-based index
    Failed { page: u64, reason: String },
    /// Shutdown was requested between pages
    Interrupted,
    /// The reconciler stopped receiving
    ConsumerClosed,
}

impl ScanCompletion {
    /// True only when every page of the table was read
    pub fn is_complete(&self) -> bool {
        matches!(self, ScanCompletion::Exhausted)
    }
}

impl fmt::Display for ScanCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanCompletion::Exhausted => write!(f, "complete"),
            ScanCompletion::Failed { page, reason } => {
                write!(f, "aborted on page {}: {}", page, reason)
            }
            ScanCompletion::Interrupted => write!(f, "interrupted"),
            ScanCompletion::ConsumerClosed => write!(f, "consumer closed"),
        }
    }
}
