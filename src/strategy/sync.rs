//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates a report request by coordinating
//! between the CsvStore (for input) and LedgerEngine (for derivation).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV reading to `CsvStore`
//! - Ledger derivation to `LedgerEngine`
//! - CSV output to `csv_format::write_ledgers_csv`

use crate::core::LedgerEngine;
use crate::io::csv_format::write_ledgers_csv;
use crate::io::CsvStore;
use crate::strategy::{LedgerRequest, ProcessingStrategy};
use crate::types::{LedgerError, LedgerReport};
use std::io::Write;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_derivation_engine::core::{ContraPolicy, EventQuery};
/// use ledger_derivation_engine::strategy::{LedgerRequest, ProcessingStrategy, SyncProcessingStrategy};
/// use chrono::NaiveDate;
/// use std::io;
///
/// let query = EventQuery::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )
/// .unwrap();
/// let request = LedgerRequest {
///     accounts_path: "accounts.csv".into(),
///     events_path: "events.csv".into(),
///     query,
///     policy: ContraPolicy::default(),
/// };
///
/// let report = SyncProcessingStrategy
///     .process(&request, &mut io::stdout())
///     .expect("Processing failed");
/// println!("balanced: {}", report.balance_check.is_balanced());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Derive the ledgers and write them to output
    ///
    /// 1. Creates a CsvStore over the two input files
    /// 2. Runs a LedgerEngine over it for the request's query
    /// 3. Writes the report using csv_format::write_ledgers_csv
    fn process(
        &self,
        request: &LedgerRequest,
        output: &mut dyn Write,
    ) -> Result<LedgerReport, LedgerError> {
        let store = CsvStore::new(&request.accounts_path, &request.events_path)
            .with_offset(request.query.offset);
        let engine = LedgerEngine::new(&store, &store, request.policy.clone());

        let report = engine.run(&request.query)?;
        write_ledgers_csv(&report, request.query.offset, output)?;

        Ok(report)
    }
}
