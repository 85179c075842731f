//! Core business logic module
//!
//! This module contains the ledger derivation components:
//! - `policy` - Injected default-account policy and resolution mode
//! - `query` - Branch and date-range scoping of a report
//! - `traits` - Read interfaces to the external store
//! - `resolver` - Contra-account resolution
//! - `synthesizer` - Event to ledger-line expansion
//! - `balance` - Running-balance fold for one account
//! - `assembler` - Grouping, per-account folds and report finalization
//! - `engine` - Synchronous report orchestration
//! - `async` - Asynchronous report orchestration with parallel folds

pub mod assembler;
pub mod r#async;
pub mod balance;
pub mod engine;
pub mod policy;
pub mod query;
pub mod resolver;
pub mod synthesizer;
pub mod traits;

pub use assembler::{GroupedLines, LedgerAssembler};
pub use balance::compute_running_balances;
pub use engine::LedgerEngine;
pub use policy::{ContraPolicy, PreferredPrefixes, ResolutionMode};
pub use query::{parse_utc_offset, EventQuery};
pub use r#async::{AsyncLedgerEngine, EngineConfig};
pub use resolver::ContraResolver;
pub use synthesizer::{synthesize, Synthesis};
pub use traits::{AccountDirectory, AsyncAccountDirectory, AsyncEventReader, EventReader};
