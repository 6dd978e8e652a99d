//! Ledger Report CLI
//!
//! Command-line interface for summarizing a ledger from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv --categories categories.csv > report.csv
//! cargo run -- --period year --today 2024-06-01 transactions.csv
//! cargo run -- --period custom --start 2024-01-01 --end 2024-03-31 transactions.csv
//! cargo run -- --strategy async --batch-size 500 --format json transactions.csv
//! ```
//!
//! The report goes to stdout. Diagnostics go to stderr and are filtered with
//! `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid period, file not found, file not readable, etc.)

use ledger_report::cli;
use ledger_report::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let request = match args.to_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_load_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&request, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
