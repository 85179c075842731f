//! I/O module
//!
//! Handles the store-facing inputs and the report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, ledger serialization)
//! - `sync_reader` - CSV-backed store for the blocking read interfaces
//! - `async_reader` - CSV-backed store for the async read interfaces
//! - `memory` - Vector-backed store for all read interfaces

pub mod async_reader;
pub mod csv_format;
pub mod memory;
pub mod sync_reader;

pub use async_reader::AsyncCsvStore;
pub use csv_format::{
    convert_account_record, convert_event_record, parse_timestamp, write_ledgers_csv,
    CsvAccountRecord, CsvEventRecord,
};
pub use memory::InMemoryStore;
pub use sync_reader::CsvStore;
