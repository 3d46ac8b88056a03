//! Progress reporting for the table scan
//!
//! Provides real-time progress display using indicatif progress bars.

use crate::walker::{ScanCounters, ScanReport};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Progress reporter that displays scan status
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(spinner_style);

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Refresh the display from live counters
    pub fn update(&self, counters: &ScanCounters) {
        let tally = counters.snapshot();
        let msg = format!(
            "Pages: {} | Rows: {} | Collections: {} | Recipes: {} | Dropped: {}",
            format_number(tally.pages),
            format_number(tally.scanned),
            format_number(tally.collections),
            format_number(tally.recipes),
            format_number(tally.dropped()),
        );

        self.bar.set_message(msg);
    }

    /// Update from `counters` every `interval` until the returned task is aborted
    pub fn spawn_ticker(
        self: Arc<Self>,
        counters: Arc<ScanCounters>,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.update(&counters);
            }
        })
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of the scan results
pub fn print_summary(report: &ScanReport, table: &str) {
    let tally = &report.tally;
    let duration_secs = report.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        tally.scanned as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    if report.is_complete() {
        println!("{}", style("Scan Complete").green().bold());
    } else {
        println!("{}", style("Scan Incomplete").yellow().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Table:").bold(), table);
    println!("  {} {}", style("Status:").bold(), report.completion);
    println!("  {} {}", style("Pages:").bold(), format_number(tally.pages));
    println!("  {} {}", style("Rows:").bold(), format_number(tally.scanned));
    println!(
        "  {} {}",
        style("Collections:").bold(),
        format_number(tally.collections)
    );
    println!("  {} {}", style("Recipes:").bold(), format_number(tally.recipes));
    println!(
        "  {} {} users, {} collections with items",
        style("Indexed:").bold(),
        format_number(report.users.len() as u64),
        format_number(report.collections.len() as u64)
    );
    println!(
        "  {} {:.1}s ({:.0} rows/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if tally.dropped() > 0 {
        println!(
            "  {} {} unrecognized, {} invalid collections, {} invalid recipes",
            style("Dropped:").yellow().bold(),
            format_number(tally.unrecognized),
            format_number(tally.invalid_collections),
            format_number(tally.invalid_recipes)
        );
    }
    println!();
}

/// Print a header at the start of the scan
pub fn print_header(table: &str, page_limit: Option<i32>, channel_capacity: usize) {
    println!();
    println!(
        "{} {}",
        style("ddb-walker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Table:").bold(), table);
    match page_limit {
        Some(limit) => println!("  {} {}", style("Page size:").bold(), limit),
        None => println!("  {} store default", style("Page size:").bold()),
    }
    println!("  {} {}", style("Buffer:").bold(), channel_capacity);
    println!();
}
