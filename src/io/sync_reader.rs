//! Synchronous CSV-backed store
//!
//! Serves the Account Directory and Event Reader interfaces from two CSV
//! exports of the external store (`accounts.csv`, `events.csv`). Delegates
//! record conversion to the csv_format module.
//!
//! # Error Handling
//!
//! - A missing file is `LedgerError::FileNotFound`; any other failure to
//!   open or read a file is `LedgerError::ReadFailure`. Both abort the report.
//! - A single bad record (unknown reason, non-positive amount, bad timestamp,
//!   wrong column count) is logged with its line number and skipped.
//!
//! ```no_run
//! use ledger_derivation_engine::core::{AccountDirectory, EventQuery};
//! use ledger_derivation_engine::io::CsvStore;
//! use std::path::Path;
//!
//! let store = CsvStore::new(Path::new("accounts.csv"), Path::new("events.csv"));
//! let accounts = store.list_accounts(None).unwrap();
//! println!("{} accounts", accounts.len());
//! ```

use crate::core::query::{account_in_branch, EventQuery};
use crate::core::traits::{AccountDirectory, EventReader};
use crate::io::csv_format::{
    convert_account_record, convert_event_record, CsvAccountRecord, CsvEventRecord,
};
use crate::types::{Account, CashEvent, LedgerError};
use chrono::{FixedOffset, Offset, Utc};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub(crate) const DIRECTORY_SOURCE: &str = "account directory";
pub(crate) const READER_SOURCE: &str = "event reader";

/// Map a failure to open a store file
pub(crate) fn open_error(path: &Path, source_name: &str, error: std::io::Error) -> LedgerError {
    if error.kind() == ErrorKind::NotFound {
        LedgerError::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        LedgerError::read_failure(
            source_name,
            format!("failed to open '{}': {}", path.display(), error),
        )
    }
}

/// CSV store over an accounts file and an events file
#[derive(Debug, Clone)]
pub struct CsvStore {
    accounts_path: PathBuf,
    events_path: PathBuf,

    /// Offset used for naive timestamps in `events.csv`
    offset: FixedOffset,
}

impl CsvStore {
    pub fn new(accounts_path: &Path, events_path: &Path) -> Self {
        Self {
            accounts_path: accounts_path.to_path_buf(),
            events_path: events_path.to_path_buf(),
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Read every row of `path`, converting each with `convert`
    ///
    /// Bad rows are logged and skipped; I/O errors abort.
    fn read_records<T, U, F>(
        path: &Path,
        source_name: &str,
        convert: F,
    ) -> Result<Vec<U>, LedgerError>
    where
        T: DeserializeOwned,
        F: Fn(T) -> Result<U, String>,
    {
        let file = File::open(path).map_err(|e| open_error(path, source_name, e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let mut converted = Vec::new();
        for (index, result) in reader.deserialize::<T>().enumerate() {
            // Header is line 1
            let line = index + 2;
            match result {
                Ok(record) => match convert(record) {
                    Ok(value) => converted.push(value),
                    Err(e) => warn!(file = %path.display(), line, "skipping record: {}", e),
                },
                Err(e) if e.is_io_error() => {
                    return Err(LedgerError::read_failure(source_name, e.to_string()));
                }
                Err(e) => warn!(file = %path.display(), line, "skipping unparsable record: {}", e),
            }
        }

        debug!(file = %path.display(), records = converted.len(), "read store file");
        Ok(converted)
    }
}

impl AccountDirectory for CsvStore {
    fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = Self::read_records::<CsvAccountRecord, _, _>(
            &self.accounts_path,
            DIRECTORY_SOURCE,
            convert_account_record,
        )?;

        accounts.retain(|account| account.is_active && account_in_branch(account, branch));
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }
}

impl EventReader for CsvStore {
    fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError> {
        let offset = self.offset;
        let mut events = Self::read_records::<CsvEventRecord, _, _>(
            &self.events_path,
            READER_SOURCE,
            |record| convert_event_record(record, offset),
        )?;

        events.retain(|event| query.admits_event(event));
        events.sort_by_key(|event| event.timestamp);
        Ok(events)
    }
}
