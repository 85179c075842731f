//! Types module
//!
//! Contains core data structures used throughout the application:
//! - `account`: chart-of-accounts entry and account taxonomy
//! - `event`: single-sided cash-movement events and the reason taxonomy
//! - `ledger`: synthesized ledger lines, per-account ledgers and reports
//! - `error`: fatal errors and non-fatal warnings

pub mod account;
pub mod error;
pub mod event;
pub mod ledger;

pub use account::{Account, AccountClass, AccountId, BranchId, NormalBalance};
pub use error::{LedgerError, LedgerWarning};
pub use event::{CashEvent, CashReason, ContraRule, EventId, FlowDirection};
pub use ledger::{AccountLedger, BalanceCheck, EntrySide, LedgerLine, LedgerReport};
