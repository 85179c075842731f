//! Asynchronous CSV-backed store
//!
//! Async counterpart of `CsvStore`, serving the async read interfaces from
//! the same two CSV exports.
//!
//! # Design
//!
//! The AsyncCsvStore uses:
//! - tokio::fs for non-blocking file access
//! - tokio-util's compat layer to hand the file to csv-async
//! - csv-async for streaming deserialization
//!
//! # Architecture
//!
//! ```text
//! tokio::fs::File → compat → csv-async deserializer → Vec<Account | CashEvent>
//!                                    ↓
//!                            csv_format module
//!                (convert_account_record, convert_event_record)
//! ```

use crate::core::query::{account_in_branch, EventQuery};
use crate::core::traits::{AsyncAccountDirectory, AsyncEventReader};
use crate::io::csv_format::{
    convert_account_record, convert_event_record, CsvAccountRecord, CsvEventRecord,
};
use crate::io::sync_reader::{open_error, DIRECTORY_SOURCE, READER_SOURCE};
use crate::types::{Account, CashEvent, LedgerError};
use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use csv_async::AsyncReaderBuilder;
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, warn};

/// Async CSV store over an accounts file and an events file
#[derive(Debug, Clone)]
pub struct AsyncCsvStore {
    accounts_path: PathBuf,
    events_path: PathBuf,
    offset: FixedOffset,
}

impl AsyncCsvStore {
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

    /// Stream every row of `path` through `convert`
    ///
    /// Invalid records are logged and skipped; I/O errors abort.
    async fn read_records<T, U, F>(
        path: &Path,
        source_name: &str,
        convert: F,
    ) -> Result<Vec<U>, LedgerError>
    where
        T: DeserializeOwned + Send + 'static,
        U: Send,
        F: Fn(T) -> Result<U, String> + Send,
    {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| open_error(path, source_name, e))?;

        let mut deserializer = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::All)
            .create_deserializer(file.compat());
        let mut records = deserializer.deserialize::<T>();

        let mut converted = Vec::new();
        let mut line = 1usize;
        while let Some(result) = records.next().await {
            line += 1;
            match result {
                Ok(record) => match convert(record) {
                    Ok(value) => converted.push(value),
                    Err(e) => warn!(file = %path.display(), line, "skipping record: {}", e),
                },
                Err(e) if matches!(e.kind(), csv_async::ErrorKind::Io(_)) => {
                    return Err(LedgerError::read_failure(source_name, e.to_string()));
                }
                Err(e) => warn!(file = %path.display(), line, "skipping unparsable record: {}", e),
            }
        }

        debug!(file = %path.display(), records = converted.len(), "read store file");
        Ok(converted)
    }
}

#[async_trait]
impl AsyncAccountDirectory for AsyncCsvStore {
    async fn list_accounts(&self, branch: Option<&str>) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = Self::read_records::<CsvAccountRecord, _, _>(
            &self.accounts_path,
            DIRECTORY_SOURCE,
            convert_account_record,
        )
        .await?;

        accounts.retain(|account| account.is_active && account_in_branch(account, branch));
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }
}

#[async_trait]
impl AsyncEventReader for AsyncCsvStore {
    async fn list_cash_events(&self, query: &EventQuery) -> Result<Vec<CashEvent>, LedgerError> {
        let offset = self.offset;
        let mut events = Self::read_records::<CsvEventRecord, _, _>(
            &self.events_path,
            READER_SOURCE,
            move |record| convert_event_record(record, offset),
        )
        .await?;

        events.retain(|event| query.admits_event(event));
        events.sort_by_key(|event| event.timestamp);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{AccountDirectory, EventReader};
    use crate::io::CsvStore;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn january() -> EventQuery {
        EventQuery::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn fixtures() -> (NamedTempFile, NamedTempFile) {
        let accounts = temp_csv(
            "id,branch_id,code,name,class,current_balance,opening_balance,is_header\n\
             rev,,4110,Penjualan,Pendapatan,,,\n\
             cash,b1,1110,Kas,Aset,100,100,\n\
             hdr,,4000,PENDAPATAN,Pendapatan,,,true\n",
        );
        let events = temp_csv(
            "id,branch_id,account_id,reason,source_type,amount,timestamp,description,reference,liability_account_id,expense_account_id\n\
             e2,b1,cash,sale,,250,2024-01-20 08:00:00,Nota 2,INV-2,,\n\
             bad,b1,cash,refund,,1,2024-01-21 08:00:00,,,,\n\
             e1,b1,cash,pengeluaran,,40,2024-01-05 09:00:00,Listrik,,,\n",
        );
        (accounts, events)
    }

    #[tokio::test]
    async fn test_matches_sync_store() {
        let (accounts, events) = fixtures();
        let sync = CsvStore::new(accounts.path(), events.path());
        let store = AsyncCsvStore::new(accounts.path(), events.path());

        assert_eq!(
            store.list_accounts(Some("b1")).await.unwrap(),
            sync.list_accounts(Some("b1")).unwrap()
        );
        assert_eq!(
            store.list_cash_events(&january()).await.unwrap(),
            sync.list_cash_events(&january()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_skips_invalid_records_and_sorts() {
        let (_accounts, events) = fixtures();
        let store = AsyncCsvStore::new(Path::new("unused.csv"), events.path());

        let listed = store.list_cash_events(&january()).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_header_flag_is_read() {
        let (accounts, _events) = fixtures();
        let store = AsyncCsvStore::new(accounts.path(), Path::new("unused.csv"));

        let listed = store.list_accounts(None).await.unwrap();
        let header = listed.iter().find(|a| a.id == "hdr").unwrap();
        assert!(header.is_header);
    }

    #[tokio::test]
    async fn test_inactive_accounts_are_not_listed() {
        let accounts = temp_csv(
            "id,branch_id,code,name,class,current_balance,opening_balance,is_header,is_active\n\
             rev-old,,4100,Penjualan Lama,Pendapatan,0,0,,no\n\
             rev,,4110,Penjualan,Pendapatan,0,0,,yes\n",
        );
        let store = AsyncCsvStore::new(accounts.path(), Path::new("unused.csv"));

        let listed = store.list_accounts(None).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["rev"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_file_not_found() {
        let store = AsyncCsvStore::new(Path::new("missing-a.csv"), Path::new("missing-e.csv"));

        let err = store.list_accounts(None).await.unwrap_err();
        assert_eq!(
            err,
            LedgerError::FileNotFound {
                path: "missing-a.csv".to_string()
            }
        );
    }
}
