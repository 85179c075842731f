//! CSV format handling for store exports and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - `CsvAccountRecord` / `CsvEventRecord` structures for deserialization
//! - Conversion from CSV records to domain types
//! - Ledger report serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, AccountLedger, CashEvent, LedgerError, LedgerReport};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Row of `accounts.csv`
///
/// Columns: `id,branch_id,code,name,class,current_balance,opening_balance,is_header,is_active`.
/// Everything after `class` may be empty or absent; an absent `is_active`
/// means the account is active.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvAccountRecord {
    pub id: String,
    #[serde(default)]
    pub branch_id: Option<String>,
    pub code: String,
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub current_balance: Option<String>,
    #[serde(default)]
    pub opening_balance: Option<String>,
    #[serde(default)]
    pub is_header: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

/// Row of `events.csv`
///
/// Columns: `id,branch_id,account_id,reason,source_type,amount,timestamp,
/// description,reference,liability_account_id,expense_account_id`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvEventRecord {
    pub id: String,
    #[serde(default)]
    pub branch_id: Option<String>,
    pub account_id: String,
    pub reason: String,
    #[serde(default)]
    pub source_type: Option<String>,
    pub amount: String,
    pub timestamp: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub liability_account_id: Option<String>,
    #[serde(default)]
    pub expense_account_id: Option<String>,
}

/// Convert a CsvAccountRecord to an Account
///
/// # Returns
///
/// * `Ok(Account)` - Successfully converted record
/// * `Err(String)` - Unknown class, bad balance or bad flag
pub fn convert_account_record(record: CsvAccountRecord) -> Result<Account, String> {
    let class = record
        .class
        .parse()
        .map_err(|e| format!("account {}: {}", record.id, e))?;

    let current_balance = parse_optional_amount(record.current_balance, "current_balance", &record.id)?;
    let opening_balance = parse_optional_amount(record.opening_balance, "opening_balance", &record.id)?;

    let is_header = parse_optional_flag(record.is_header, "is_header", &record.id)?.unwrap_or(false);
    let is_active = parse_optional_flag(record.is_active, "is_active", &record.id)?.unwrap_or(true);

    Ok(Account {
        id: record.id,
        code: record.code,
        name: record.name,
        class,
        branch_id: non_empty(record.branch_id),
        current_balance,
        opening_balance,
        is_header,
        is_active,
    })
}

/// Convert a CsvEventRecord to a CashEvent
///
/// Naive timestamps are read in `offset`, the caller's reference offset.
///
/// # Returns
///
/// * `Ok(CashEvent)` - Successfully converted record
/// * `Err(String)` - Unknown reason, non-positive or unparsable amount, or
///   unparsable timestamp
pub fn convert_event_record(record: CsvEventRecord, offset: FixedOffset) -> Result<CashEvent, String> {
    let reason = record
        .reason
        .parse()
        .map_err(|e| format!("event {}: {}", record.id, e))?;

    let amount = Decimal::from_str(record.amount.trim())
        .map_err(|_| format!("event {}: invalid amount '{}'", record.id, record.amount))?;
    if amount <= Decimal::ZERO {
        return Err(format!(
            "event {}: amount must be positive, got {}",
            record.id, amount
        ));
    }

    let timestamp = parse_timestamp(&record.timestamp, offset)
        .map_err(|e| format!("event {}: {}", record.id, e))?;

    Ok(CashEvent {
        id: record.id,
        account_id: record.account_id,
        branch_id: non_empty(record.branch_id),
        reason,
        source_type: non_empty(record.source_type),
        amount,
        timestamp,
        description: record.description.unwrap_or_default(),
        reference: record.reference.unwrap_or_default(),
        explicit_liability_account_id: non_empty(record.liability_account_id),
        explicit_expense_account_id: non_empty(record.expense_account_id),
    })
}

/// Parse an RFC 3339 timestamp, or `YYYY-MM-DD HH:MM:SS` in `offset`
pub fn parse_timestamp(text: &str, offset: FixedOffset) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("invalid timestamp '{}'", text))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("invalid timestamp '{}'", text))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_optional_amount(value: Option<String>, field: &str, id: &str) -> Result<Decimal, String> {
    match non_empty(value) {
        None => Ok(Decimal::ZERO),
        Some(text) => Decimal::from_str(&text)
            .map_err(|_| format!("account {}: invalid {} '{}'", id, field, text)),
    }
}

fn parse_optional_flag(value: Option<String>, field: &str, id: &str) -> Result<Option<bool>, String> {
    match non_empty(value).map(|flag| flag.to_lowercase()) {
        None => Ok(None),
        Some(flag) => match flag.as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(format!("account {}: invalid {} '{}'", id, field, flag)),
        },
    }
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn optional_amount(value: Decimal) -> String {
    if value.is_zero() {
        String::new()
    } else {
        amount(value)
    }
}

fn write_failed(what: &str, e: impl std::fmt::Display) -> LedgerError {
    LedgerError::IoError {
        message: format!("Failed to write {}: {}", what, e),
    }
}

/// Write a ledger report in CSV format
///
/// Columns: `account_code, account_name, date, description, source, reference,
/// debit, credit, balance`. Each ledger is written as an opening-balance row,
/// one row per line (dates in `offset`, `source` holding the reason's export
/// label), and a total row. A final `Balance check` row carries `PASS` or
/// `FAIL` with the grand totals and their difference.
///
/// # Arguments
///
/// * `report` - The derived report
/// * `offset` - Reference offset for rendering dates
/// * `output` - Writer receiving the CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(LedgerError::IoError)` if a write error occurred
pub fn write_ledgers_csv(
    report: &LedgerReport,
    offset: FixedOffset,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "account_code",
            "account_name",
            "date",
            "description",
            "source",
            "reference",
            "debit",
            "credit",
            "balance",
        ])
        .map_err(|e| write_failed("CSV header", e))?;

    for ledger in &report.ledgers {
        write_ledger(&mut writer, ledger, offset).map_err(|e| write_failed("ledger record", e))?;
    }

    let check = &report.balance_check;
    writer
        .write_record([
            "",
            "",
            "",
            "Balance check",
            if check.is_balanced() { "PASS" } else { "FAIL" },
            "",
            &amount(check.total_debit),
            &amount(check.total_credit),
            &amount(check.difference),
        ])
        .map_err(|e| write_failed("balance check", e))?;

    writer.flush().map_err(|e| write_failed("output", e))?;

    Ok(())
}

fn write_ledger<W: Write>(
    writer: &mut csv::Writer<W>,
    ledger: &AccountLedger,
    offset: FixedOffset,
) -> Result<(), csv::Error> {
    let code = ledger.account.code.as_str();
    let name = ledger.account.name.as_str();

    writer.write_record([
        code,
        name,
        "",
        "Opening balance",
        "",
        "",
        "",
        "",
        &amount(ledger.opening_balance),
    ])?;

    for line in &ledger.lines {
        let date = line.date.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S").to_string();
        writer.write_record([
            code,
            name,
            &date,
            &line.description,
            line.source_reason.label(),
            &line.reference,
            &optional_amount(line.debit_amount),
            &optional_amount(line.credit_amount),
            &amount(line.running_balance),
        ])?;
    }

    writer.write_record([
        code,
        name,
        "",
        "Total",
        "",
        "",
        &amount(ledger.total_debit),
        &amount(ledger.total_credit),
        &amount(ledger.closing_balance),
    ])
}
