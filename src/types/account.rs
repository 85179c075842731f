//! Account-related types for the Ledger Derivation Engine
//!
//! This module defines the chart-of-accounts entry the engine reads from the
//! Account Directory, together with the account taxonomy that drives the
//! double-entry sign convention.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identifier as issued by the external store
pub type AccountId = String;

/// Branch identifier; absent in single-tenant deployments
pub type BranchId = String;

/// Side of the ledger on which an account's balance grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Balance increases on debit, decreases on credit
    Debit,
    /// Balance increases on credit, decreases on debit
    Credit,
}

impl NormalBalance {
    /// Signed balance movement caused by one line on an account of this side
    ///
    /// Debit-normal: `debit - credit`. Credit-normal: `credit - debit`.
    pub fn movement(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            NormalBalance::Debit => debit - credit,
            NormalBalance::Credit => credit - debit,
        }
    }
}

/// Account taxonomy
///
/// The class decides both the sign convention (see [`NormalBalance`]) and
/// which accounts are eligible as contra accounts for a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountClass {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountClass {
    /// Normal balance side for this class
    ///
    /// Asset and Expense are debit-normal; Liability, Equity and Revenue are
    /// credit-normal.
    pub fn normal_side(self) -> NormalBalance {
        match self {
            AccountClass::Asset | AccountClass::Expense => NormalBalance::Debit,
            AccountClass::Liability | AccountClass::Equity | AccountClass::Revenue => {
                NormalBalance::Credit
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountClass::Asset => "asset",
            AccountClass::Liability => "liability",
            AccountClass::Equity => "equity",
            AccountClass::Revenue => "revenue",
            AccountClass::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountClass {
    type Err = String;

    /// Parse an account class, accepting the store's native (Indonesian) names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "aset" => Ok(AccountClass::Asset),
            "liability" | "kewajiban" => Ok(AccountClass::Liability),
            "equity" | "modal" => Ok(AccountClass::Equity),
            "revenue" | "pendapatan" => Ok(AccountClass::Revenue),
            "expense" | "beban" => Ok(AccountClass::Expense),
            other => Err(format!("unknown account class: '{other}'")),
        }
    }
}

/// Chart-of-accounts entry
///
/// Supplied by the Account Directory and treated as a read-only lookup table.
/// The engine never updates `current_balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// Code, unique within a branch (e.g. `"1110"`)
    pub code: String,

    pub name: String,

    pub class: AccountClass,

    /// Branch the account belongs to, `None` for global accounts
    pub branch_id: Option<BranchId>,

    /// Balance as currently stored; only consulted by the filter policy
    pub current_balance: Decimal,

    /// Balance at the start of the reporting period
    pub opening_balance: Decimal,

    /// Explicit summary/group flag from the store
    ///
    /// Header accounts are also recognised by a reserved code suffix, see
    /// `ContraPolicy::is_header`.
    pub is_header: bool,

    /// Deactivated accounts are not listed by any Account Directory
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl Account {
    /// Create a postable account with zero balances
    pub fn new(
        id: impl Into<AccountId>,
        code: impl Into<String>,
        name: impl Into<String>,
        class: AccountClass,
    ) -> Self {
        Account {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            class,
            branch_id: None,
            current_balance: Decimal::ZERO,
            opening_balance: Decimal::ZERO,
            is_header: false,
            is_active: true,
        }
    }

    /// Set both the opening and the current balance
    pub fn with_balance(mut self, opening: Decimal, current: Decimal) -> Self {
        self.opening_balance = opening;
        self.current_balance = current;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<BranchId>) -> Self {
        self.branch_id = Some(branch.into());
        self
    }

    pub fn as_header(mut self) -> Self {
        self.is_header = true;
        self
    }

    pub fn as_inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::asset(AccountClass::Asset, NormalBalance::Debit)]
    #[case::expense(AccountClass::Expense, NormalBalance::Debit)]
    #[case::liability(AccountClass::Liability, NormalBalance::Credit)]
    #[case::equity(AccountClass::Equity, NormalBalance::Credit)]
    #[case::revenue(AccountClass::Revenue, NormalBalance::Credit)]
    fn test_normal_side(#[case] class: AccountClass, #[case] expected: NormalBalance) {
        assert_eq!(class.normal_side(), expected);
    }

    #[rstest]
    #[case::debit_line_on_debit_normal(NormalBalance::Debit, dec!(100), dec!(0), dec!(100))]
    #[case::credit_line_on_debit_normal(NormalBalance::Debit, dec!(0), dec!(40), dec!(-40))]
    #[case::debit_line_on_credit_normal(NormalBalance::Credit, dec!(100), dec!(0), dec!(-100))]
    #[case::credit_line_on_credit_normal(NormalBalance::Credit, dec!(0), dec!(40), dec!(40))]
    fn test_movement(
        #[case] side: NormalBalance,
        #[case] debit: Decimal,
        #[case] credit: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(side.movement(debit, credit), expected);
    }

    #[rstest]
    #[case("asset", AccountClass::Asset)]
    #[case("Aset", AccountClass::Asset)]
    #[case("KEWAJIBAN", AccountClass::Liability)]
    #[case("Modal", AccountClass::Equity)]
    #[case(" pendapatan ", AccountClass::Revenue)]
    #[case("Beban", AccountClass::Expense)]
    #[case("Expense", AccountClass::Expense)]
    fn test_class_parsing(#[case] input: &str, #[case] expected: AccountClass) {
        assert_eq!(input.parse::<AccountClass>(), Ok(expected));
    }

    #[test]
    fn test_class_parsing_rejects_unknown() {
        let err = "hpp".parse::<AccountClass>().unwrap_err();
        assert!(err.contains("unknown account class"));
    }
}
