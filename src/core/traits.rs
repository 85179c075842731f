//! Read interfaces to the external store
//!
//! The engine only ever reads: one listing of the chart of accounts and one
//! listing of cash events for a branch and date range. Both interfaces come
//! in a blocking and an async flavour so the sync and async engines can share
//! the same store implementations.

use crate::core::query::EventQuery;
use crate::types::{Account, CashEvent, LedgerError};
use async_trait::async_trait;
use std::sync::Arc;

/// Blocking chart-of-accounts source
pub trait AccountDirectory {
    /// List the accounts visible to `branch` (all accounts when `None`)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ReadFailure` (or a file-level error) if the
    /// directory cannot be read. The report is aborted.
    fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError>;
}

/// Blocking cash-event source
pub trait EventReader {
    /// List the events admitted by `query`, ideally ordered by timestamp
    ///
    /// Callers re-sort, so the ordering is a courtesy rather than a contract.
    fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError>;
}

/// Async chart-of-accounts source
#[async_trait]
pub trait AsyncAccountDirectory: Send + Sync {
    async fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError>;
}

/// Async cash-event source
#[async_trait]
pub trait AsyncEventReader: Send + Sync {
    async fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError>;
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for &T {
    fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
        (**self).list_accounts(branch)
    }
}

impl<T: EventReader + ?Sized> EventReader for &T {
    fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError> {
        (**self).list_cash_events(query)
    }
}

#[async_trait]
impl<T: AsyncAccountDirectory + ?Sized> AsyncAccountDirectory for Arc<T> {
    async fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
        (**self).list_accounts(branch).await
    }
}

#[async_trait]
impl<T: AsyncEventReader + ?Sized> AsyncEventReader for Arc<T> {
    async fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError> {
        (**self).list_cash_events(query).await
    }
}
