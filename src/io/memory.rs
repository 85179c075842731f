//! In-memory store
//!
//! Holds accounts and events in plain vectors and serves all four read
//! interfaces from them. Useful for embedding callers that already have the
//! data loaded, and for tests.

use crate::core::query::{account_in_branch, EventQuery};
use crate::core::traits::{AccountDirectory, AsyncAccountDirectory, AsyncEventReader, EventReader};
use crate::io::sync_reader::{DIRECTORY_SOURCE, READER_SOURCE};
use crate::types::{Account, CashEvent, LedgerError};
use async_trait::async_trait;

/// Vector-backed Account Directory and Event Reader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryStore {
    accounts: Vec<Account>,
    events: Vec<CashEvent>,

    /// When set, every read fails with this message
    failure: Option<String>,
}

impl InMemoryStore {
    pub fn new(accounts: Vec<Account>, events: Vec<CashEvent>) -> Self {
        Self {
            accounts,
            events,
            failure: None,
        }
    }

    /// A store whose reads always fail with `ReadFailure`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    fn check(&self, source_name: &str) -> Result<(), LedgerError> {
        match &self.failure {
            Some(message) => Err(LedgerError::read_failure(source_name, message.clone())),
            None => Ok(()),
        }
    }
}

impl AccountDirectory for InMemoryStore {
    fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
        self.check(DIRECTORY_SOURCE)?;

        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|account| account.is_active && account_in_branch(account, branch))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }
}

impl EventReader for InMemoryStore {
    fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError> {
        self.check(READER_SOURCE)?;

        let mut events: Vec<CashEvent> = self
            .events
            .iter()
            .filter(|event| query.admits_event(event))
            .cloned()
            .collect();
        events.sort_by_key(|event| event.timestamp);
        Ok(events)
    }
}

#[async_trait]
impl AsyncAccountDirectory for InMemoryStore {
    async fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
        AccountDirectory::list_accounts(self, branch)
    }
}

#[async_trait]
impl AsyncEventReader for InMemoryStore {
    async fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError> {
        EventReader::list_cash_events(self, query)
    }
}
