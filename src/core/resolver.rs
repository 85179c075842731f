//! Contra-account resolution
//!
//! Given an event, decides which non-cash account receives the offsetting
//! entry. Resolution is a pure function of the event, the chart of accounts
//! and the injected [`ContraPolicy`]:
//!
//! 1. An explicit account reference on the event wins if that id exists.
//! 2. Otherwise the default-account policy picks a non-header account of the
//!    counterpart class, preferring codes with the class's conventional
//!    prefix, then the lowest code. The outcome does not depend on the order
//!    in which the directory lists accounts.
//! 3. If nothing qualifies, there is no contra account.

use crate::core::policy::ContraPolicy;
use crate::types::{Account, AccountClass, CashEvent};
use std::cmp::Ordering;
use tracing::debug;

/// Resolves contra accounts under a fixed policy
#[derive(Debug, Clone, Default)]
pub struct ContraResolver {
    policy: ContraPolicy,
}

impl ContraResolver {
    pub fn new(policy: ContraPolicy) -> Self {
        ContraResolver { policy }
    }

    pub fn policy(&self) -> &ContraPolicy {
        &self.policy
    }

    /// Resolve the contra account for `event`
    ///
    /// Returns `None` for reasons without a contra rule (transfers and the
    /// non-sale inflows) and when no eligible account exists.
    pub fn resolve<'a>(&self, event: &CashEvent, accounts: &'a [Account]) -> Option<&'a Account> {
        let rule = event.effective_reason().contra_rule();
        let class = rule.counterpart_class()?;

        if let Some(explicit_id) = rule.explicit_reference(event) {
            match accounts.iter().find(|account| &account.id == explicit_id) {
                Some(account) => return Some(account),
                None => debug!(
                    event_id = %event.id,
                    account_id = %explicit_id,
                    "explicit contra account not in directory, falling back to default policy"
                ),
            }
        }

        self.default_account(class, accounts)
    }

    /// Default counterpart account for a class
    pub fn default_account<'a>(
        &self,
        class: AccountClass,
        accounts: &'a [Account],
    ) -> Option<&'a Account> {
        accounts
            .iter()
            .filter(|account| account.class == class && !self.policy.is_header(account))
            .min_by(|a, b| self.rank(a, b))
    }

    /// Preferred-prefix accounts first, then by code, then by id
    fn rank(&self, a: &Account, b: &Account) -> Ordering {
        let a_preferred = self.policy.is_preferred(a);
        let b_preferred = self.policy.is_preferred(b);

        b_preferred
            .cmp(&a_preferred)
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CashReason;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn event(reason: CashReason) -> CashEvent {
        CashEvent::new(
            "ev-1",
            "cash",
            reason,
            dec!(100),
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        )
    }

    fn chart() -> Vec<Account> {
        vec![
            Account::new("cash", "1110", "Kas Kecil", AccountClass::Asset),
            Account::new("ap-header", "2000", "KEWAJIBAN", AccountClass::Liability),
            Account::new("ap", "2110", "Hutang Usaha", AccountClass::Liability),
            Account::new("ap-bank", "2210", "Hutang Bank", AccountClass::Liability),
            Account::new("rev-header", "4000", "PENDAPATAN", AccountClass::Revenue),
            Account::new("rev-other", "7100", "Pendapatan Lain", AccountClass::Revenue),
            Account::new("rev", "4110", "Penjualan Produk", AccountClass::Revenue),
            Account::new("hpp", "5100", "Harga Pokok", AccountClass::Expense),
            Account::new("exp", "6100", "Beban Gaji", AccountClass::Expense),
            Account::new("exp-rent", "6400", "Beban Sewa", AccountClass::Expense),
        ]
    }

    #[rstest]
    #[case::sale_to_revenue(CashReason::Sale, Some("rev"))]
    #[case::payable_to_liability(CashReason::PayablePayment, Some("ap"))]
    #[case::po_to_liability(CashReason::PurchaseOrderPayment, Some("ap"))]
    #[case::expense_prefers_six(CashReason::Expense, Some("exp"))]
    #[case::payroll_is_expense(CashReason::Payroll, Some("exp"))]
    #[case::advance_is_expense(CashReason::AdvanceWithdrawal, Some("exp"))]
    #[case::manual_out_is_expense(CashReason::ManualCashOut, Some("exp"))]
    #[case::transfer_in_has_none(CashReason::TransferIn, None)]
    #[case::transfer_out_has_none(CashReason::TransferOut, None)]
    #[case::receivable_has_none(CashReason::ReceivablePayment, None)]
    fn test_default_resolution(#[case] reason: CashReason, #[case] expected: Option<&str>) {
        let accounts = chart();
        let resolver = ContraResolver::default();
        let resolved = resolver.resolve(&event(reason), &accounts).map(|a| a.id.as_str());
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_explicit_liability_wins() {
        let accounts = chart();
        let ev = event(CashReason::PayablePayment).with_liability_account("ap-bank");
        let resolved = ContraResolver::default().resolve(&ev, &accounts);
        assert_eq!(resolved.map(|a| a.id.as_str()), Some("ap-bank"));
    }

    #[test]
    fn test_explicit_expense_wins() {
        let accounts = chart();
        let ev = event(CashReason::Expense).with_expense_account("hpp");
        let resolved = ContraResolver::default().resolve(&ev, &accounts);
        assert_eq!(resolved.map(|a| a.id.as_str()), Some("hpp"));
    }

    #[test]
    fn test_explicit_reference_of_other_rule_is_ignored() {
        let accounts = chart();
        let ev = event(CashReason::Expense).with_liability_account("ap-bank");
        let resolved = ContraResolver::default().resolve(&ev, &accounts);
        assert_eq!(resolved.map(|a| a.id.as_str()), Some("exp"));
    }

    #[test]
    fn test_unknown_explicit_reference_falls_back() {
        let accounts = chart();
        let ev = event(CashReason::PayablePayment).with_liability_account("ghost");
        let resolved = ContraResolver::default().resolve(&ev, &accounts);
        assert_eq!(resolved.map(|a| a.id.as_str()), Some("ap"));
    }

    #[test]
    fn test_transfer_source_type_suppresses_contra() {
        let accounts = chart();
        let ev = event(CashReason::Expense).with_source_type("transfer_keluar");
        assert!(ContraResolver::default().resolve(&ev, &accounts).is_none());
    }

    #[test]
    fn test_headers_are_never_selected() {
        let accounts = vec![
            Account::new("rev-header", "4000", "PENDAPATAN", AccountClass::Revenue),
            Account::new("rev-group", "4100", "Pendapatan Usaha", AccountClass::Revenue).as_header(),
        ];
        let resolved = ContraResolver::default().resolve(&event(CashReason::Sale), &accounts);
        assert!(resolved.is_none());
    }

    #[test]
    fn test_falls_back_to_non_preferred_prefix() {
        let accounts = vec![
            Account::new("cash", "1110", "Kas", AccountClass::Asset),
            Account::new("misc", "8200", "Pendapatan Lain", AccountClass::Revenue),
            Account::new("misc2", "7100", "Pendapatan Bunga", AccountClass::Revenue),
        ];
        let resolved = ContraResolver::default().resolve(&event(CashReason::Sale), &accounts);
        assert_eq!(resolved.map(|a| a.id.as_str()), Some("misc2"));
    }

    #[test]
    fn test_no_matching_class_resolves_nothing() {
        let accounts = vec![Account::new("cash", "1110", "Kas", AccountClass::Asset)];
        let resolved = ContraResolver::default().resolve(&event(CashReason::Expense), &accounts);
        assert!(resolved.is_none());
    }

    #[test]
    fn test_resolution_ignores_directory_order() {
        let mut accounts = chart();
        let resolver = ContraResolver::default();
        let forward = resolver
            .resolve(&event(CashReason::Sale), &accounts)
            .map(|a| a.id.clone());

        accounts.reverse();
        let backward = resolver
            .resolve(&event(CashReason::Sale), &accounts)
            .map(|a| a.id.clone());

        assert_eq!(forward, backward);
        assert_eq!(forward.as_deref(), Some("rev"));
    }

    #[test]
    fn test_configured_prefix_changes_default() {
        let mut policy = ContraPolicy::default();
        policy.preferred_prefixes.expense = "5".to_string();
        let accounts = chart();

        let resolved = ContraResolver::new(policy).resolve(&event(CashReason::Expense), &accounts);
        assert_eq!(resolved.map(|a| a.id.as_str()), Some("hpp"));
    }
}
