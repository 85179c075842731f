//! Ledger Derivation Engine Library
//! # Overview
//!
//! This library derives per-account double-entry ledgers from a single-sided
//! log of cash movements. Each cash event names only the cash account it
//! touched; the engine infers the balancing (contra) account from the event's
//! reason, synthesizes both ledger lines, and folds them into running
//! balances. A sync and an async strategy produce identical reports.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, CashEvent, LedgerLine, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::resolver`] - Contra-account resolution under a [`ContraPolicy`]
//!   - [`core::synthesizer`] - Turning one cash event into ledger postings
//!   - [`core::balance`] - Running balances in each account's normal direction
//!   - [`core::assembler`] - Grouping, folding and the balance check
//!   - [`core::engine`] - Read-then-assemble orchestration
//! - [`io`] - CSV and in-memory stores, and the ledger CSV writer
//! - [`strategy`] - Sync and async end-to-end processing
//!
//! # Cash Reasons
//!
//! Every event carries one of twelve reasons. The reason fixes the cash
//! line's side (inflows debit cash, outflows credit it) and the contra rule:
//!
//! - **Sale**: credit a revenue account
//! - **Payable / purchase-order payment**: debit a liability account
//! - **Expense, employee advance, manual cash out, payroll**: debit an expense account
//! - **Transfers and the remaining inflows**: cash line only
//!
//! # Report
//!
//! Each ledger carries an opening balance, chronologically ordered lines with
//! running balances, debit/credit totals and a closing balance. An account is
//! left out only when it has no lines in the period and both its opening and
//! current balances are zero. Inactive accounts are never listed. The report-wide
//! balance check compares total debits with total credits.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{ContraPolicy, EventQuery, LedgerAssembler, LedgerEngine, ResolutionMode};
pub use io::write_ledgers_csv;
pub use types::{
    Account, AccountClass, AccountLedger, BalanceCheck, CashEvent, CashReason, LedgerError,
    LedgerLine, LedgerReport, LedgerWarning,
};
