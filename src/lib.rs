//! ddb-walker - Full-table DynamoDB scanner and collection reconciler
//!
//! Scans every row of a collections table whose rows come in two untagged
//! shapes (collections and saved-recipe links), sorts each row into its
//! shape, and groups the results per user and per collection in memory for
//! reporting.
//!
//! # Features
//!
//! - **Tag-free classification**: rows are recognized by which fields they
//!   carry, in a fixed priority order.
//!
//! - **Streaming**: a background producer pages through the table while the
//!   reconciler indexes rows as they arrive.
//!
//! - **Bounded memory**: each stream is a bounded channel with backpressure,
//!   so a slow reconciler pauses the scan instead of buffering the table.
//!
//! - **Accountable results**: every run reports how many rows were scanned,
//!   classified, unrecognized or invalid, and why the scan stopped.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        DynamoDB table                           │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ Scan (ExclusiveStartKey / Limit)
//!                               ▼
//!            ┌──────────────────────────────────────┐
//!            │     Producer task                    │
//!            │  - classify rows                     │
//!            │  - split into two bounded channels   │
//!            └──────────┬──────────────┬────────────┘
//!                       │              │
//!                       ▼              ▼
//!            ┌──────────────────────────────────────┐
//!            │     Reconciler                       │
//!            │  - map to domain entities            │
//!            │  - group per user / per collection   │
//!            └──────────────────┬───────────────────┘
//!                               ▼
//!                    ┌──────────────────┐
//!                    │   ScanReport     │
//!                    └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! ddb-walker --table feast-collections-content-table-PROD --threshold 2
//! ```

pub mod config;
pub mod error;
pub mod progress;
pub mod record;
pub mod report;
pub mod store;
pub mod walker;

pub use config::{CliArgs, ScanConfig};
pub use error::{Result, WalkerError};
pub use record::{classify, Classified, Collection, CollectionsIndex, SavedItem, UsersIndex};
pub use store::{DynamoTable, MemoryTable, TableScan};
pub use walker::{ScanCompletion, ScanCoordinator, ScanOptions, ScanReport, ScanTally};
