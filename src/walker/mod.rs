//! Table scan pipeline
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │       TableScan         │
//!                     │  scan_page(cursor, n)   │
//!                     └───────────┬─────────────┘
//!                                 │ pages
//!                     ┌───────────▼─────────────┐
//!                     │   Producer (spawned)    │
//!                     │  classify each row      │
//!                     └─────┬─────────────┬─────┘
//!            collections    │             │    recipes
//!          (bounded mpsc)   │             │  (bounded mpsc)
//!                     ┌─────▼─────────────▼─────┐
//!                     │      Reconciler         │
//!                     │  select! until both     │
//!                     │  channels have closed   │
//!                     └───────────┬─────────────┘
//!                                 │
//!                      UsersIndex + CollectionsIndex
//! ```

pub mod coordinator;
pub mod producer;
pub mod reconciler;
pub mod stats;

pub use coordinator::{ScanCoordinator, ScanReport};
pub use producer::{scan_table, ScanOptions, ScanStreams, DEFAULT_CHANNEL_CAPACITY};
pub use reconciler::{reconcile, Reconciled, Reconciler};
pub use stats::{ScanCompletion, ScanCounters, ScanTally};
