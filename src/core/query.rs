//! Report query scoping
//!
//! A query selects one branch (or every branch in a single-tenant
//! deployment) and an inclusive range of whole days, interpreted in the
//! caller's reference UTC offset.

use crate::types::{Account, BranchId, CashEvent, LedgerError};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

/// Branch and date-range filter for a ledger report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub branch: Option<BranchId>,
    pub from: NaiveDate,
    pub to: NaiveDate,

    /// Reference offset in which `from` / `to` are whole days
    pub offset: FixedOffset,
}

impl EventQuery {
    /// Create a UTC query for `from ..= to`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidDateRange` if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, LedgerError> {
        if from > to {
            return Err(LedgerError::InvalidDateRange { from, to });
        }

        Ok(EventQuery {
            branch: None,
            from,
            to,
            offset: Utc.fix(),
        })
    }

    pub fn with_branch(mut self, branch: impl Into<BranchId>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// First instant of `from` (00:00:00 local)
    pub fn start(&self) -> DateTime<Utc> {
        self.local_midnight(self.from)
    }

    /// First instant after `to` (00:00:00 local on the following day)
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        match self.to.succ_opt() {
            Some(next) => self.local_midnight(next),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Whether `timestamp` falls inside the inclusive day range
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start() && timestamp < self.end_exclusive()
    }

    /// Whether an event belongs to this query's branch and range
    pub fn admits_event(&self, event: &CashEvent) -> bool {
        let branch_ok = match &self.branch {
            Some(branch) => event.branch_id.as_ref() == Some(branch),
            None => true,
        };
        branch_ok && self.contains(event.timestamp)
    }

    /// Whether an account is visible to this query's branch
    ///
    /// Accounts without a branch are global and visible everywhere.
    pub fn admits_account(&self, account: &Account) -> bool {
        account_in_branch(account, self.branch.as_deref())
    }

    fn local_midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        let local = day.and_time(NaiveTime::MIN);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local - shift))
    }
}

/// Branch scoping rule shared by every Account Directory implementation
pub fn account_in_branch(account: &Account, branch: Option<&str>) -> bool {
    match (branch, account.branch_id.as_deref()) {
        (None, _) | (_, None) => true,
        (Some(wanted), Some(actual)) => wanted == actual,
    }
}

/// Parse a `±HH:MM` (or `Z`) UTC offset
pub fn parse_utc_offset(text: &str) -> Result<FixedOffset, String> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    text.parse::<FixedOffset>()
        .map_err(|e| format!("invalid UTC offset '{text}': expected ±HH:MM ({e})"))
}
