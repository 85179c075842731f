//! Asynchronous processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. The two store reads run concurrently, optionally
//! under a deadline, and per-account folds are spread over tokio worker
//! threads.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── EngineConfig (max_concurrent_folds, read_timeout)
//!     ├── AsyncCsvStore (csv-async reads over tokio::fs)
//!     └── AsyncLedgerEngine
//!         ├── try_join!(accounts, events)
//!         ├── LedgerAssembler::group
//!         └── fold_parallel (tokio tasks)
//! ```
//!
//! The report is identical to the one the synchronous strategy produces.

use crate::core::{AsyncLedgerEngine, EngineConfig};
use crate::io::csv_format::write_ledgers_csv;
use crate::io::AsyncCsvStore;
use crate::strategy::{LedgerRequest, ProcessingStrategy};
use crate::types::{LedgerError, LedgerReport};
use std::io::Write;
use std::sync::Arc;

/// Asynchronous processing strategy
///
/// # Configuration
///
/// The strategy accepts an EngineConfig with:
/// - `max_concurrent_folds`: Number of worker threads and fold tasks (default: CPU cores)
/// - `read_timeout`: Deadline for the store reads (default: none)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: EngineConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Derive the ledgers and write them to output
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Runs an AsyncLedgerEngine over an AsyncCsvStore for the query
    /// 3. Writes the report using csv_format::write_ledgers_csv
    fn process(
        &self,
        request: &LedgerRequest,
        output: &mut dyn Write,
    ) -> Result<LedgerReport, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_folds.max(1))
            .enable_all()
            .build()
            .map_err(|e| LedgerError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let store = Arc::new(
            AsyncCsvStore::new(&request.accounts_path, &request.events_path)
                .with_offset(request.query.offset),
        );
        let engine = AsyncLedgerEngine::new(
            Arc::clone(&store),
            store,
            request.policy.clone(),
            self.config.clone(),
        );

        let report = runtime.block_on(engine.run(&request.query))?;
        write_ledgers_csv(&report, request.query.offset, output)?;

        Ok(report)
    }
}
