//! ddb-walker - Full-table DynamoDB scanner and collection reconciler
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use ddb_walker::config::{CliArgs, ScanConfig};
use ddb_walker::progress::{print_header, print_summary, ProgressReporter};
use ddb_walker::report::print_affected;
use ddb_walker::store::DynamoTable;
use ddb_walker::walker::ScanCoordinator;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        // Report printed, but the table was not fully read
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<bool> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    if config.show_progress {
        print_header(&config.table, config.page_limit, config.channel_capacity);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    runtime.block_on(run_scan(config))
}

async fn run_scan(config: ScanConfig) -> Result<bool> {
    let store = DynamoTable::connect(
        config.table.clone(),
        config.region.clone(),
        config.endpoint_url.clone(),
    )
    .await
    .context("Failed to initialize DynamoDB client")?;

    let coordinator = ScanCoordinator::new(store, config.scan_options());

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping after the current page...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Create progress reporter
    let progress = config.show_progress.then(|| Arc::new(ProgressReporter::new()));
    let ticker = progress.as_ref().map(|p| {
        p.set_status("Scanning...");
        Arc::clone(p).spawn_ticker(coordinator.counters(), Duration::from_millis(200))
    });

    info!(table = %config.table, "Scanning table");
    let report = coordinator.run().await.context("Scan failed")?;

    if let Some(ticker) = ticker {
        ticker.abort();
    }
    if let Some(ref p) = progress {
        if report.is_complete() {
            p.finish("Scan completed");
        } else {
            p.finish("Scan stopped early");
        }
    }

    info!("Reconciling...");
    print_affected(&report.users, &report.collections, config.threshold);

    if config.show_progress {
        print_summary(&report, &config.table);
    }

    if !report.is_complete() {
        warn!(completion = %report.completion, "Results are incomplete");
    }

    Ok(report.is_complete())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("ddb_walker=debug,warn")
    } else {
        EnvFilter::new("ddb_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
