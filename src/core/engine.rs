//! Synchronous ledger derivation engine
//!
//! This module provides the `LedgerEngine` that orchestrates one report
//! request: read the chart of accounts, read the events in range, and hand
//! both to the `LedgerAssembler`.
//!
//! The engine holds no state between requests. Running the same query twice
//! (or from several callers at once) gives identical reports.

use crate::core::assembler::LedgerAssembler;
use crate::core::policy::ContraPolicy;
use crate::core::query::EventQuery;
use crate::core::traits::{AccountDirectory, EventReader};
use crate::types::{LedgerError, LedgerReport};
use tracing::info;

/// Blocking report orchestrator over a directory and an event reader
pub struct LedgerEngine<D, R> {
    directory: D,
    reader: R,
    assembler: LedgerAssembler,
}

impl<D, R> LedgerEngine<D, R>
where
    D: AccountDirectory,
    R: EventReader,
{
    /// Create a new LedgerEngine
    ///
    /// # Arguments
    ///
    /// * `directory` - Source of the chart of accounts
    /// * `reader` - Source of cash events
    /// * `policy` - Default-account policy for contra resolution
    pub fn new(directory: D, reader: R, policy: ContraPolicy) -> Self {
        LedgerEngine {
            directory,
            reader,
            assembler: LedgerAssembler::new(policy),
        }
    }

    /// Derive the ledgers for one query
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerReport)` with ledgers, warnings and the balance check
    /// * `Err(LedgerError)` if either read fails; no partial report is built
    pub fn run(&self, query: &EventQuery) -> Result<LedgerReport, LedgerError> {
        let accounts = self.directory.list_accounts(query.branch.as_deref())?;
        let events = self.reader.list_cash_events(query)?;

        let report = self.assembler.assemble(accounts, &events);
        log_summary(query, events.len(), &report);

        Ok(report)
    }
}

pub(crate) fn log_summary(query: &EventQuery, events: usize, report: &LedgerReport) {
    info!(
        branch = query.branch.as_deref().unwrap_or("*"),
        from = %query.from,
        to = %query.to,
        events,
        ledgers = report.ledgers.len(),
        warnings = report.warnings.len(),
        balanced = report.balance_check.is_balanced(),
        "ledger report derived"
    );
}
