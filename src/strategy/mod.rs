//! Processing strategy module for ledger report requests
//!
//! This module defines the Strategy pattern for complete report pipelines,
//! encompassing the store reads, the ledger derivation and the CSV export.
//! This allows different processing implementations (synchronous, asynchronous
//! with parallel folds) to be selected at runtime.

use crate::cli::StrategyType;
use crate::core::{ContraPolicy, EventQuery};
use crate::types::{LedgerError, LedgerReport};
use std::io::Write;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::AsyncProcessingStrategy;
pub use crate::core::EngineConfig;
pub use sync::SyncProcessingStrategy;

/// Everything one report request needs
#[derive(Debug, Clone)]
pub struct LedgerRequest {
    /// Path to `accounts.csv`
    pub accounts_path: PathBuf,
    /// Path to `events.csv`
    pub events_path: PathBuf,
    /// Branch, date range and reference offset
    pub query: EventQuery,
    pub policy: ContraPolicy,
}

/// Processing strategy trait for complete report pipelines
///
/// Each strategy must read the store files, derive the ledgers through the
/// matching engine, and write the ledger CSV to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Derive the ledgers for `request` and write them to `output`
    ///
    /// # Arguments
    ///
    /// * `request` - Input files, query and policy
    /// * `output` - Mutable reference to a writer for the ledger CSV
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerReport)` if the report was derived and written; it may
    ///   still carry warnings and a failed balance check
    /// * `Err(LedgerError)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file cannot be opened or read
    /// - The reads miss the configured deadline (async only)
    /// - Output cannot be written
    ///
    /// Bad records and unresolvable contra accounts are logged and reported
    /// as warnings; they never abort the request.
    fn process(
        &self,
        request: &LedgerRequest,
        output: &mut dyn Write,
    ) -> Result<LedgerReport, LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for the async engine (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<EngineConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
