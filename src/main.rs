//! Ledger Derivation Engine CLI
//!
//! Command-line interface for deriving per-account ledgers from CSV exports
//! of a chart of accounts and a cash-movement log.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts accounts.csv --events events.csv \
//!     --from 2024-01-01 --to 2024-01-31 > ledgers.csv
//! cargo run -- --strategy sync --branch b1 --utc-offset +07:00 \
//!     --accounts accounts.csv --events events.csv --from 2024-01-01 --to 2024-01-31
//! cargo run -- --strategy async --max-concurrent 8 --timeout-secs 30 --strict \
//!     --policy policy.toml --accounts accounts.csv --events events.csv \
//!     --from 2024-01-01 --to 2024-03-31 > ledgers.csv
//! ```
//!
//! The ledgers are written to stdout. Warnings and diagnostics go to stderr;
//! set `RUST_LOG` (e.g. `RUST_LOG=info`) for more detail.
//!
//! # Processing Strategies
//!
//! - **sync**: Synchronous CSV reads and single-threaded folding
//! - **async**: Concurrent reads with an optional deadline and parallel folding (default)
//!
//! # Exit Codes
//!
//! - 0: Success, including reports whose balance check fails
//! - 1: Error (missing arguments, file not found, bad policy file, timeout, etc.)

use ledger_derivation_engine::cli;
use ledger_derivation_engine::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let request = match args.to_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_engine_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    // Output goes to stdout
    let mut output = std::io::stdout();
    match strategy.process(&request, &mut output) {
        Ok(report) => {
            let check = &report.balance_check;
            if !check.is_balanced() {
                eprintln!(
                    "BALANCE CHECK FAILED: debits {:.2}, credits {:.2}, difference {:.2}",
                    check.total_debit, check.total_credit, check.difference
                );
            }
            if !report.warnings.is_empty() {
                eprintln!("{} warning(s) recorded", report.warnings.len());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
