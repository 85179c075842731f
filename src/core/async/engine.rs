//! Asynchronous ledger derivation engine
//!
//! This module provides the `AsyncLedgerEngine`, which produces the same
//! report as the synchronous `LedgerEngine` but:
//!
//! - issues the account and event reads concurrently, since neither depends
//!   on the other's result;
//! - optionally bounds both reads with a deadline (the only suspension
//!   points of a request, so the only place cancellation applies);
//! - folds the per-account ledgers in parallel tokio tasks once grouping is
//!   complete.
//!
//! # Architecture
//!
//! ```text
//! AsyncLedgerEngine
//!     ├── AsyncAccountDirectory ─┐
//!     ├── AsyncEventReader ──────┴─ try_join! (+ timeout)
//!     ├── LedgerAssembler::group      (sequential)
//!     ├── fold_parallel               (tokio tasks)
//!     └── LedgerAssembler::finalize   (sequential)
//! ```

use std::time::Duration;

use futures::try_join;
use tracing::warn;

use super::fold::fold_parallel;
use crate::core::assembler::LedgerAssembler;
use crate::core::engine::log_summary;
use crate::core::policy::ContraPolicy;
use crate::core::query::EventQuery;
use crate::core::traits::{AsyncAccountDirectory, AsyncEventReader};
use crate::types::{Account, CashEvent, LedgerError, LedgerReport};

/// Tuning for the async engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of fold tasks running at once
    pub max_concurrent_folds: usize,
    /// Deadline covering both reads; `None` waits indefinitely
    pub read_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_folds: num_cpus::get(),
            read_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Create a new EngineConfig with custom values
    ///
    /// A zero `max_concurrent_folds` or a zero timeout is replaced by the
    /// default, with a warning.
    pub fn new(max_concurrent_folds: usize, read_timeout: Option<Duration>) -> Self {
        let default = Self::default();

        let max_concurrent_folds = if max_concurrent_folds == 0 {
            warn!(
                "Invalid max_concurrent_folds ({}), using default ({})",
                max_concurrent_folds, default.max_concurrent_folds
            );
            default.max_concurrent_folds
        } else {
            max_concurrent_folds
        };

        let read_timeout = match read_timeout {
            Some(timeout) if timeout.is_zero() => {
                warn!("Invalid read timeout (0s), reads will not time out");
                None
            }
            other => other,
        };

        Self {
            max_concurrent_folds,
            read_timeout,
        }
    }
}

/// Async report orchestrator over an async directory and event reader
#[derive(Debug, Clone)]
pub struct AsyncLedgerEngine<D, R> {
    directory: D,
    reader: R,
    assembler: LedgerAssembler,
    config: EngineConfig,
}

impl<D, R> AsyncLedgerEngine<D, R>
where
    D: AsyncAccountDirectory,
    R: AsyncEventReader,
{
    /// Create a new AsyncLedgerEngine
    ///
    /// # Arguments
    ///
    /// * `directory` - Async source of the chart of accounts
    /// * `reader` - Async source of cash events
    /// * `policy` - Default-account policy for contra resolution
    /// * `config` - Fold parallelism and read deadline
    pub fn new(directory: D, reader: R, policy: ContraPolicy, config: EngineConfig) -> Self {
        Self {
            directory,
            reader,
            assembler: LedgerAssembler::new(policy),
            config,
        }
    }

    /// Derive the ledgers for one query
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerReport)` identical to what `LedgerEngine::run` returns
    /// * `Err(LedgerError::Timeout)` if the reads miss the deadline
    /// * `Err(LedgerError)` from whichever read failed first
    /// * `Err(LedgerError::Runtime)` if a fold task failed
    pub async fn run(&self, query: &EventQuery) -> Result<LedgerReport, LedgerError> {
        let (accounts, events) = self.read(query).await?;

        let (slots, warnings) = self.assembler.group(accounts, &events).into_slots();
        let ledgers = fold_parallel(slots, self.config.max_concurrent_folds).await?;
        let report = LedgerAssembler::finalize(ledgers, warnings);

        log_summary(query, events.len(), &report);
        Ok(report)
    }

    async fn read(&self, query: &EventQuery) -> Result<(Vec<Account>, Vec<CashEvent>), LedgerError> {
        let reads = async {
            try_join!(
                self.directory.list_accounts(query.branch.as_deref()),
                self.reader.list_cash_events(query)
            )
        };

        match self.config.read_timeout {
            Some(deadline) => tokio::time::timeout(deadline, reads)
                .await
                .map_err(|_| LedgerError::Timeout {
                    millis: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => reads.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::LedgerEngine;
    use crate::core::policy::ResolutionMode;
    use crate::io::InMemoryStore;
    use crate::types::{AccountClass, CashReason};
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn query() -> EventQuery {
        EventQuery::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn store() -> Arc<InMemoryStore> {
        let at = |d| Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap();
        Arc::new(InMemoryStore::new(
            vec![
                Account::new("cash", "1110", "Kas", AccountClass::Asset)
                    .with_balance(dec!(100000), dec!(100000)),
                Account::new("ap", "2110", "Hutang Usaha", AccountClass::Liability)
                    .with_balance(dec!(50000), dec!(50000)),
                Account::new("rev", "4110", "Penjualan", AccountClass::Revenue),
                Account::new("idle", "1190", "Kas Cadangan", AccountClass::Asset),
            ],
            vec![
                CashEvent::new("e3", "cash", CashReason::Expense, dec!(75000), at(3)),
                CashEvent::new("e1", "cash", CashReason::Sale, dec!(500000), at(1)),
                CashEvent::new("e2", "cash", CashReason::PayablePayment, dec!(20000), at(2)),
            ],
        ))
    }

    struct SlowStore;

    #[async_trait]
    impl AsyncAccountDirectory for SlowStore {
        async fn list_accounts(&self, _branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_matches_sync_engine() {
        let store = store();
        let policy = ContraPolicy::default();

        let sync = LedgerEngine::new(store.as_ref(), store.as_ref(), policy.clone())
            .run(&query())
            .unwrap();
        let engine = AsyncLedgerEngine::new(
            Arc::clone(&store),
            Arc::clone(&store),
            policy,
            EngineConfig::new(2, None),
        );

        assert_eq!(engine.run(&query()).await.unwrap(), sync);
    }

    #[tokio::test]
    async fn test_strict_mode_matches_sync_engine() {
        let store = store();
        let policy = ContraPolicy::default().with_mode(ResolutionMode::Strict);

        let sync = LedgerEngine::new(store.as_ref(), store.as_ref(), policy.clone())
            .run(&query())
            .unwrap();
        let engine =
            AsyncLedgerEngine::new(Arc::clone(&store), store, policy, EngineConfig::default());

        let report = engine.run(&query()).await.unwrap();
        assert_eq!(report, sync);
        assert!(report.balance_check.is_balanced());
    }

    #[tokio::test]
    async fn test_read_failure_is_propagated() {
        let failing = Arc::new(InMemoryStore::failing("store unreachable"));
        let engine = AsyncLedgerEngine::new(
            Arc::clone(&failing),
            store(),
            ContraPolicy::default(),
            EngineConfig::default(),
        );

        let err = engine.run(&query()).await.unwrap_err();
        assert!(matches!(err, LedgerError::ReadFailure { .. }));
    }

    #[tokio::test]
    async fn test_read_deadline() {
        let engine = AsyncLedgerEngine::new(
            SlowStore,
            store(),
            ContraPolicy::default(),
            EngineConfig::new(1, Some(Duration::from_millis(20))),
        );

        let err = engine.run(&query()).await.unwrap_err();
        assert_eq!(err, LedgerError::Timeout { millis: 20 });
    }

    #[test]
    fn test_config_zero_values_fall_back() {
        let config = EngineConfig::new(0, Some(Duration::ZERO));
        assert_eq!(config.max_concurrent_folds, num_cpus::get());
        assert_eq!(config.read_timeout, None);
    }

    #[test]
    fn test_config_custom_values() {
        let config = EngineConfig::new(3, Some(Duration::from_secs(5)));
        assert_eq!(config.max_concurrent_folds, 3);
        assert_eq!(config.read_timeout, Some(Duration::from_secs(5)));
    }
}
