//! Asynchronous implementations of core components
//!
//! This module provides the async counterpart of the synchronous
//! `LedgerEngine`. The transform itself stays the same; what changes is how
//! the work is scheduled.
//!
//! # Architecture
//!
//! - **AsyncLedgerEngine**: concurrent reads with an optional deadline, then
//!   grouping, parallel folds and finalization
//! - **fold_parallel**: spreads independent per-account folds over tokio tasks
//! - **EngineConfig**: fold parallelism and read deadline
//!
//! # Thread Safety
//!
//! No state is shared between fold tasks. Each task owns the slots it folds,
//! so no locking is involved and results are identical to a sequential run.

pub mod engine;
pub mod fold;

pub use engine::{AsyncLedgerEngine, EngineConfig};
pub use fold::fold_parallel;
