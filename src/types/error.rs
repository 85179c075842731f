//! Error and warning types for the Ledger Derivation Engine
//!
//! # Error Categories
//!
//! - **Fatal** ([`LedgerError`]): a read of the Account Directory or Event
//!   Reader failed, the request itself is invalid, or the output could not be
//!   written. The report is aborted and no partial ledger is returned.
//! - **Non-fatal** ([`LedgerWarning`]): data-quality anomalies in the event
//!   log or chart of accounts. They are logged, attached to the report, and
//!   the derivation degrades gracefully.

use super::account::AccountId;
use super::event::{CashReason, EventId};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Fatal error for a report request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Account Directory or Event Reader failed
    ///
    /// Propagated to the caller unmodified; no partial result.
    #[error("{source_name} read failed: {message}")]
    ReadFailure {
        /// Which collaborator failed ("account directory", "event reader")
        source_name: String,
        message: String,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {message}")]
    IoError { message: String },

    /// Malformed input file structure (not a single bad record)
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// Deployment configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The reads did not complete before the request deadline
    #[error("Read deadline of {millis}ms exceeded")]
    Timeout { millis: u64 },

    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        LedgerError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create a ReadFailure error
    pub fn read_failure(source_name: &str, message: impl Into<String>) -> Self {
        LedgerError::ReadFailure {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        LedgerError::Config {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        LedgerError::Runtime {
            message: message.into(),
        }
    }
}

/// Non-fatal anomaly met while deriving ledgers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum LedgerWarning {
    /// No contra account could be resolved; the cash line was kept and the
    /// contra line omitted.
    #[error("event {event_id} ({reason}): no contra account resolved, contra line omitted")]
    UnresolvedContra { event_id: EventId, reason: CashReason },

    /// Event references an account that is not in the directory; skipped.
    #[error("event {event_id}: unknown account '{account_id}', event skipped")]
    MalformedEvent {
        event_id: EventId,
        account_id: AccountId,
    },

    /// Strict mode: event could not be balanced and was left out entirely.
    #[error("event {event_id} ({reason}): no contra account resolved, event rejected")]
    RejectedUnbalanced { event_id: EventId, reason: CashReason },

    /// The directory listed the same account id more than once; the first
    /// entry wins.
    #[error("account '{account_id}' listed more than once, duplicate ignored")]
    DuplicateAccount { account_id: AccountId },
}
