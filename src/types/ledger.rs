//! Ledger output types
//!
//! These are ephemeral values produced per report request. Nothing here is
//! persisted by the engine.

use super::account::Account;
use super::error::LedgerWarning;
use super::event::{CashReason, EventId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Side of a single ledger line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntrySide {
    Debit,
    Credit,
}

/// One posting to one account
///
/// Exactly one of `debit_amount` / `credit_amount` is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerLine {
    pub date: DateTime<Utc>,
    pub description: String,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,

    /// Filled in by the balance calculator; zero until then
    pub running_balance: Decimal,

    pub reference: String,
    pub source_reason: CashReason,

    /// Event the line was synthesized from
    pub event_id: EventId,
}

impl LedgerLine {
    /// Create a single-sided line of `amount` on `side`
    pub fn posting(
        side: EntrySide,
        amount: Decimal,
        date: DateTime<Utc>,
        description: impl Into<String>,
        reference: impl Into<String>,
        source_reason: CashReason,
        event_id: impl Into<EventId>,
    ) -> Self {
        let (debit_amount, credit_amount) = match side {
            EntrySide::Debit => (amount, Decimal::ZERO),
            EntrySide::Credit => (Decimal::ZERO, amount),
        };

        LedgerLine {
            date,
            description: description.into(),
            debit_amount,
            credit_amount,
            running_balance: Decimal::ZERO,
            reference: reference.into(),
            source_reason,
            event_id: event_id.into(),
        }
    }

    pub fn side(&self) -> EntrySide {
        if self.debit_amount.is_zero() {
            EntrySide::Credit
        } else {
            EntrySide::Debit
        }
    }

    /// Debit minus credit
    pub fn net(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

/// Running-balance view of all postings to one account over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountLedger {
    pub account: Account,

    /// Sorted by date ascending
    pub lines: Vec<LedgerLine>,

    pub opening_balance: Decimal,
    pub total_debit: Decimal,
    pub total_credit: Decimal,

    /// Running balance of the last line, or the opening balance when empty
    pub closing_balance: Decimal,
}

impl AccountLedger {
    /// Whether the filter policy drops this ledger from the report
    ///
    /// A ledger is hidden only when it has no lines and both its opening and
    /// current balance are zero.
    pub fn is_dormant(&self) -> bool {
        self.lines.is_empty()
            && self.account.current_balance.is_zero()
            && self.opening_balance.is_zero()
    }
}

/// Debit/credit totals across a whole ledger set
///
/// Surfaced to callers as a pass/fail indicator so an unbalanced book is
/// never presented silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceCheck {
    pub total_debit: Decimal,
    pub total_credit: Decimal,

    /// `total_debit - total_credit`
    pub difference: Decimal,
}

impl BalanceCheck {
    pub fn from_ledgers(ledgers: &[AccountLedger]) -> Self {
        let (total_debit, total_credit) = ledgers
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), ledger| {
                (debit + ledger.total_debit, credit + ledger.total_credit)
            });

        BalanceCheck {
            total_debit,
            total_credit,
            difference: total_debit - total_credit,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero()
    }
}

/// Result of one ledger derivation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerReport {
    /// Per-account ledgers in account-code order
    pub ledgers: Vec<AccountLedger>,

    /// Non-fatal anomalies met while deriving the ledgers
    pub warnings: Vec<LedgerWarning>,

    pub balance_check: BalanceCheck,
}

impl LedgerReport {
    pub fn ledger(&self, account_id: &str) -> Option<&AccountLedger> {
        self.ledgers.iter().find(|l| l.account.id == account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountClass;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn line(side: EntrySide, amount: Decimal) -> LedgerLine {
        LedgerLine::posting(
            side,
            amount,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            "desc",
            "ref",
            CashReason::Sale,
            "ev",
        )
    }

    fn ledger(debit: Decimal, credit: Decimal) -> AccountLedger {
        AccountLedger {
            account: Account::new("a", "1110", "Kas", AccountClass::Asset),
            lines: vec![],
            opening_balance: Decimal::ZERO,
            total_debit: debit,
            total_credit: credit,
            closing_balance: Decimal::ZERO,
        }
    }

    #[test]
    fn test_posting_is_single_sided() {
        let debit = line(EntrySide::Debit, dec!(25));
        assert_eq!(debit.debit_amount, dec!(25));
        assert_eq!(debit.credit_amount, Decimal::ZERO);
        assert_eq!(debit.side(), EntrySide::Debit);
        assert_eq!(debit.net(), dec!(25));

        let credit = line(EntrySide::Credit, dec!(25));
        assert_eq!(credit.debit_amount, Decimal::ZERO);
        assert_eq!(credit.credit_amount, dec!(25));
        assert_eq!(credit.side(), EntrySide::Credit);
        assert_eq!(credit.net(), dec!(-25));
    }

    #[test]
    fn test_balance_check_passes_when_totals_match() {
        let check = BalanceCheck::from_ledgers(&[ledger(dec!(500), dec!(0)), ledger(dec!(0), dec!(500))]);
        assert!(check.is_balanced());
        assert_eq!(check.difference, Decimal::ZERO);
    }

    #[test]
    fn test_balance_check_fails_on_missing_contra() {
        let check = BalanceCheck::from_ledgers(&[ledger(dec!(0), dec!(75000))]);
        assert!(!check.is_balanced());
        assert_eq!(check.difference, dec!(-75000));
    }

    #[test]
    fn test_dormant_requires_all_three_conditions() {
        let mut l = ledger(dec!(0), dec!(0));
        assert!(l.is_dormant());

        l.account.current_balance = dec!(1);
        assert!(!l.is_dormant());

        l.account.current_balance = Decimal::ZERO;
        l.opening_balance = dec!(1);
        assert!(!l.is_dormant());

        l.opening_balance = Decimal::ZERO;
        l.lines.push(line(EntrySide::Debit, dec!(1)));
        assert!(!l.is_dormant());
    }
}
