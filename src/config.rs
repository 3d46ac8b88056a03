//! Configuration types for ddb-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use crate::walker::{ScanOptions, DEFAULT_CHANNEL_CAPACITY};
use clap::Parser;

/// Table scanned when none is given
pub const DEFAULT_TABLE: &str = "feast-collections-content-table-CODE";

/// Channel capacity limits
const MIN_CHANNEL_CAPACITY: usize = 1;
const MAX_CHANNEL_CAPACITY: usize = 100_000;

/// Users with more collections than this are reported
pub const DEFAULT_THRESHOLD: usize = 2;

/// Full-table DynamoDB scanner that reports users with duplicate collections
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ddb-walker",
    version,
    about = "Scan a collections table and report users with too many collections",
    long_about = "Scans every row of a DynamoDB collections table, sorts rows into collections \
                  and saved recipes, groups them per user and per collection, and reports \
                  users who own more collections than expected.",
    after_help = "EXAMPLES:\n    \
        ddb-walker --table feast-collections-content-table-PROD\n    \
        ddb-walker -t my-table --limit 500 --threshold 3\n    \
        ddb-walker -t my-table --endpoint-url http://localhost:8000 --region eu-west-1"
)]
pub struct CliArgs {
    /// Table to scan
    #[arg(short, long, env = "DDB_WALKER_TABLE", default_value = DEFAULT_TABLE, value_name = "NAME")]
    pub table: String,

    /// Rows per scan page (-1 for the store default)
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true, value_name = "NUM")]
    pub limit: i32,

    /// Buffer size of each producer channel
    #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY, value_name = "NUM")]
    pub channel_capacity: usize,

    /// Report users owning more than this many collections
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_name = "COUNT")]
    pub threshold: usize,

    /// AWS region (defaults to the environment's)
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Override the DynamoDB endpoint (e.g. DynamoDB Local)
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Table name
    pub table: String,

    /// Page size; `None` uses the store default
    pub page_limit: Option<i32>,

    /// Producer channel capacity
    pub channel_capacity: usize,

    /// Report threshold
    pub threshold: usize,

    pub region: Option<String>,

    pub endpoint_url: Option<String>,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl ScanConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let table = args.table.trim().to_string();
        if table.is_empty() {
            return Err(ConfigError::EmptyTableName);
        }

        let page_limit = match args.limit {
            -1 => None,
            n if n > 0 => Some(n),
            n => return Err(ConfigError::InvalidPageLimit { limit: n }),
        };

        if args.channel_capacity < MIN_CHANNEL_CAPACITY
            || args.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::InvalidChannelCapacity {
                capacity: args.channel_capacity,
                min: MIN_CHANNEL_CAPACITY,
                max: MAX_CHANNEL_CAPACITY,
            });
        }

        Ok(Self {
            table,
            page_limit,
            channel_capacity: args.channel_capacity,
            threshold: args.threshold,
            region: args.region,
            endpoint_url: args.endpoint_url,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Producer settings
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            page_limit: self.page_limit,
            channel_capacity: self.channel_capacity,
        }
    }
}
