//! Ledger assembly
//!
//! Assembly runs in three explicit phases:
//!
//! 1. **Group**: every event is synthesized into lines, and each line is
//!    appended to its account's slot in an arena (`Vec<Vec<LedgerLine>>`)
//!    indexed by account. This is the only phase that touches more than one
//!    account at a time.
//! 2. **Fold**: each slot is turned into an [`AccountLedger`] on its own. A
//!    fold reads nothing but its own account and lines, so folds can run in
//!    any order or in parallel (see `core::async::fold`).
//! 3. **Finalize**: dormant ledgers are dropped, the rest sorted by account
//!    code, and the balance check computed.

use crate::core::balance::compute_running_balances;
use crate::core::policy::ContraPolicy;
use crate::core::resolver::ContraResolver;
use crate::core::synthesizer::synthesize;
use crate::types::{
    Account, AccountLedger, BalanceCheck, CashEvent, LedgerLine, LedgerReport, LedgerWarning,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Output of the grouping phase
///
/// `accounts[i]` owns the lines in `lines[i]`, in event timestamp order.
#[derive(Debug, Clone, Default)]
pub struct GroupedLines {
    pub accounts: Vec<Account>,
    pub lines: Vec<Vec<LedgerLine>>,
    pub warnings: Vec<LedgerWarning>,
}

impl GroupedLines {
    /// Split into independent `(account, lines)` slots and the warnings
    pub fn into_slots(self) -> (Vec<(Account, Vec<LedgerLine>)>, Vec<LedgerWarning>) {
        let slots = self.accounts.into_iter().zip(self.lines).collect();
        (slots, self.warnings)
    }
}

/// Builds per-account ledgers from accounts and events
#[derive(Debug, Clone, Default)]
pub struct LedgerAssembler {
    resolver: ContraResolver,
}

impl LedgerAssembler {
    pub fn new(policy: ContraPolicy) -> Self {
        LedgerAssembler {
            resolver: ContraResolver::new(policy),
        }
    }

    pub fn resolver(&self) -> &ContraResolver {
        &self.resolver
    }

    /// Run all three phases sequentially
    ///
    /// # Arguments
    ///
    /// * `accounts` - Chart of accounts for the report scope
    /// * `events` - Events in range, in any order
    ///
    /// # Returns
    ///
    /// The filtered, code-ordered ledgers together with every warning met
    pub fn assemble(&self, accounts: Vec<Account>, events: &[CashEvent]) -> LedgerReport {
        let (slots, warnings) = self.group(accounts, events).into_slots();
        let ledgers = slots
            .into_iter()
            .map(|(account, lines)| Self::fold_account(account, lines))
            .collect();

        Self::finalize(ledgers, warnings)
    }

    /// Grouping phase: synthesize every event into the per-account arena
    ///
    /// Accounts listed twice keep their first entry. Events are visited in
    /// timestamp order (stable for ties), whatever order the reader used.
    pub fn group(&self, accounts: Vec<Account>, events: &[CashEvent]) -> GroupedLines {
        let mut warnings = Vec::new();

        let mut unique: Vec<Account> = Vec::with_capacity(accounts.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(accounts.len());
        for account in accounts {
            if !seen.insert(account.id.clone()) {
                let warning = LedgerWarning::DuplicateAccount {
                    account_id: account.id.clone(),
                };
                warn!(account_id = %account.id, "{}", warning);
                warnings.push(warning);
                continue;
            }
            unique.push(account);
        }

        let mut ordered: Vec<&CashEvent> = events.iter().collect();
        ordered.sort_by_key(|event| event.timestamp);

        let mut lines: Vec<Vec<LedgerLine>> = vec![Vec::new(); unique.len()];
        {
            let slot_of: HashMap<&str, usize> = unique
                .iter()
                .enumerate()
                .map(|(slot, account)| (account.id.as_str(), slot))
                .collect();

            for event in ordered {
                let synthesis = synthesize(event, &unique, &self.resolver);
                warnings.extend(synthesis.warning);

                for (account_id, line) in synthesis.postings {
                    if let Some(&slot) = slot_of.get(account_id.as_str()) {
                        lines[slot].push(line);
                    }
                }
            }
        }

        debug!(
            accounts = unique.len(),
            events = events.len(),
            warnings = warnings.len(),
            "grouped ledger lines"
        );

        GroupedLines {
            accounts: unique,
            lines,
            warnings,
        }
    }

    /// Fold phase for one account
    ///
    /// Depends only on its arguments, so any number of folds may run
    /// concurrently.
    pub fn fold_account(account: Account, lines: Vec<LedgerLine>) -> AccountLedger {
        let opening_balance = account.opening_balance;
        let (lines, closing_balance) =
            compute_running_balances(account.class, opening_balance, lines);

        let (total_debit, total_credit) = lines
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), line| {
                (debit + line.debit_amount, credit + line.credit_amount)
            });

        AccountLedger {
            account,
            lines,
            opening_balance,
            total_debit,
            total_credit,
            closing_balance,
        }
    }

    /// Finalize phase: filter, order and balance-check the folded ledgers
    pub fn finalize(ledgers: Vec<AccountLedger>, warnings: Vec<LedgerWarning>) -> LedgerReport {
        let mut ledgers: Vec<AccountLedger> = ledgers
            .into_iter()
            .filter(|ledger| !ledger.is_dormant())
            .collect();
        ledgers.sort_by(|a, b| {
            a.account
                .code
                .cmp(&b.account.code)
                .then_with(|| a.account.id.cmp(&b.account.id))
        });

        let balance_check = BalanceCheck::from_ledgers(&ledgers);

        LedgerReport {
            ledgers,
            warnings,
            balance_check,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::ResolutionMode;
    use crate::types::{AccountClass, CashReason};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
    }

    fn cash() -> Account {
        Account::new("cash", "1110", "Kas", AccountClass::Asset)
    }

    fn revenue() -> Account {
        Account::new("rev", "4110", "Penjualan", AccountClass::Revenue)
    }

    #[test]
    fn test_sale_scenario() {
        let events = vec![CashEvent::new("e1", "cash", CashReason::Sale, dec!(500000), at(1))];
        let report = LedgerAssembler::default().assemble(vec![revenue(), cash()], &events);

        assert_eq!(report.ledgers.len(), 2);
        let cash = report.ledger("cash").unwrap();
        assert_eq!(cash.lines.len(), 1);
        assert_eq!(cash.total_debit, dec!(500000));
        assert_eq!(cash.closing_balance, dec!(500000));

        let rev = report.ledger("rev").unwrap();
        assert_eq!(rev.total_credit, dec!(500000));
        assert_eq!(rev.closing_balance, dec!(500000));

        assert!(report.balance_check.is_balanced());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_payable_scenario_reduces_liability() {
        let accounts = vec![
            cash().with_balance(dec!(1000000), dec!(1000000)),
            Account::new("ap", "2110", "Hutang Usaha", AccountClass::Liability)
                .with_balance(dec!(1000000), dec!(1000000)),
        ];
        let events = vec![
            CashEvent::new("e1", "cash", CashReason::PayablePayment, dec!(200000), at(2))
                .with_liability_account("ap"),
        ];

        let report = LedgerAssembler::default().assemble(accounts, &events);

        assert_eq!(report.ledger("cash").unwrap().closing_balance, dec!(800000));
        let ap = report.ledger("ap").unwrap();
        assert_eq!(ap.total_debit, dec!(200000));
        assert_eq!(ap.closing_balance, dec!(800000));
    }

    #[test]
    fn test_unresolved_expense_is_flagged_as_imbalance() {
        let events = vec![CashEvent::new("e1", "cash", CashReason::Expense, dec!(75000), at(3))];
        let report = LedgerAssembler::default().assemble(vec![cash()], &events);

        let cash = report.ledger("cash").unwrap();
        assert_eq!(cash.total_credit, dec!(75000));
        assert_eq!(cash.closing_balance, dec!(-75000));

        assert!(!report.balance_check.is_balanced());
        assert_eq!(report.balance_check.difference, dec!(-75000));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_strict_mode_drops_unbalanced_event() {
        let events = vec![CashEvent::new("e1", "cash", CashReason::Expense, dec!(75000), at(3))];
        let assembler = LedgerAssembler::new(ContraPolicy::default().with_mode(ResolutionMode::Strict));
        let report = assembler.assemble(vec![cash()], &events);

        assert!(report.ledgers.is_empty());
        assert!(report.balance_check.is_balanced());
        assert!(matches!(
            report.warnings.as_slice(),
            [LedgerWarning::RejectedUnbalanced { .. }]
        ));
    }

    #[test]
    fn test_filter_policy() {
        let accounts = vec![
            Account::new("a", "1110", "Kas", AccountClass::Asset).with_balance(dec!(300000), dec!(0)),
            Account::new("b", "1120", "Bank", AccountClass::Asset).with_balance(dec!(0), dec!(50000)),
            Account::new("c", "1130", "Kas Kecil", AccountClass::Asset),
            Account::new("d", "1140", "Deposit", AccountClass::Asset)
                .with_balance(dec!(100), dec!(100)),
        ];

        let report = LedgerAssembler::default().assemble(accounts, &[]);

        let ids: Vec<&str> = report.ledgers.iter().map(|l| l.account.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);
        let d = report.ledger("d").unwrap();
        assert_eq!(d.closing_balance, d.opening_balance);
    }

    #[test]
    fn test_ledgers_ordered_by_code() {
        let accounts = vec![
            Account::new("z", "6100", "Beban", AccountClass::Expense).with_balance(dec!(1), dec!(1)),
            Account::new("y", "1110", "Kas", AccountClass::Asset).with_balance(dec!(1), dec!(1)),
            Account::new("x", "2110", "Hutang", AccountClass::Liability).with_balance(dec!(1), dec!(1)),
        ];

        let report = LedgerAssembler::default().assemble(accounts, &[]);
        let codes: Vec<&str> = report.ledgers.iter().map(|l| l.account.code.as_str()).collect();
        assert_eq!(codes, vec!["1110", "2110", "6100"]);
    }

    #[test]
    fn test_event_order_does_not_change_result() {
        let events = vec![
            CashEvent::new("e3", "cash", CashReason::Expense, dec!(30), at(3)),
            CashEvent::new("e1", "cash", CashReason::Sale, dec!(100), at(1)),
            CashEvent::new("e2", "cash", CashReason::Sale, dec!(20), at(2)),
        ];
        let mut sorted = events.clone();
        sorted.sort_by_key(|e| e.timestamp);

        let accounts = vec![
            cash(),
            revenue(),
            Account::new("exp", "6100", "Beban", AccountClass::Expense),
        ];
        let assembler = LedgerAssembler::default();

        let shuffled = assembler.assemble(accounts.clone(), &events);
        let ordered = assembler.assemble(accounts, &sorted);

        assert_eq!(shuffled, ordered);
        let running: Vec<Decimal> = shuffled
            .ledger("cash")
            .unwrap()
            .lines
            .iter()
            .map(|l| l.running_balance)
            .collect();
        assert_eq!(running, vec![dec!(100), dec!(120), dec!(90)]);
    }

    #[test]
    fn test_malformed_event_is_skipped() {
        let events = vec![
            CashEvent::new("e1", "ghost", CashReason::Sale, dec!(10), at(1)),
            CashEvent::new("e2", "cash", CashReason::Sale, dec!(5), at(1)),
        ];
        let report = LedgerAssembler::default().assemble(vec![cash(), revenue()], &events);

        assert_eq!(report.ledger("cash").unwrap().total_debit, dec!(5));
        assert_eq!(report.ledger("rev").unwrap().total_credit, dec!(5));
        assert!(matches!(
            report.warnings.as_slice(),
            [LedgerWarning::MalformedEvent { .. }]
        ));
    }

    #[test]
    fn test_duplicate_accounts_keep_first() {
        let accounts = vec![
            cash().with_balance(dec!(10), dec!(10)),
            cash().with_balance(dec!(99), dec!(99)),
        ];
        let report = LedgerAssembler::default().assemble(accounts, &[]);

        assert_eq!(report.ledgers.len(), 1);
        assert_eq!(report.ledgers[0].opening_balance, dec!(10));
        assert_eq!(
            report.warnings,
            vec![LedgerWarning::DuplicateAccount {
                account_id: "cash".to_string()
            }]
        );
    }

    #[test]
    fn test_group_then_fold_in_any_order_matches_assemble() {
        let events = vec![
            CashEvent::new("e1", "cash", CashReason::Sale, dec!(100), at(1)),
            CashEvent::new("e2", "cash", CashReason::Sale, dec!(50), at(2)),
        ];
        let accounts = vec![cash(), revenue()];
        let assembler = LedgerAssembler::default();

        let (slots, warnings) = assembler.group(accounts.clone(), &events).into_slots();
        let ledgers: Vec<AccountLedger> = slots
            .into_iter()
            .rev()
            .map(|(account, lines)| LedgerAssembler::fold_account(account, lines))
            .collect();

        let reversed = LedgerAssembler::finalize(ledgers, warnings);
        assert_eq!(reversed, assembler.assemble(accounts, &events));
    }
}
