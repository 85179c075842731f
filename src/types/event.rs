//! Cash-movement event types for the Ledger Derivation Engine
//!
//! The event log is single-sided: one row per cash in/out event, tagged with
//! a business reason. This module defines the event record and the closed
//! reason taxonomy, including how each reason maps to a cash-flow direction
//! and to a contra-posting rule.

use super::account::{AccountClass, AccountId, BranchId};
use super::ledger::EntrySide;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Event identifier as issued by the external store
pub type EventId = String;

/// Direction of a cash movement as seen from the cash account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDirection {
    /// Cash account receives a debit line
    Inflow,
    /// Cash account receives a credit line
    Outflow,
}

impl FlowDirection {
    /// Side of the cash-account line for this direction
    pub fn cash_side(self) -> EntrySide {
        match self {
            FlowDirection::Inflow => EntrySide::Debit,
            FlowDirection::Outflow => EntrySide::Credit,
        }
    }
}

/// Contra-posting rule attached to a reason
///
/// Each rule names the counterpart account class, the side the contra line is
/// posted on, and which explicit account reference (if any) on the event
/// overrides the default-account policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContraRule {
    /// No contra line; transfers carry their own matching event and the
    /// remaining inflows have no configured counterpart.
    NoContra,
    /// Revenue account is credited (sales)
    Revenue,
    /// Liability account is debited (paying down a payable, not an expense)
    SettleLiability,
    /// Expense account is debited
    Expense,
}

impl ContraRule {
    /// Account class that must receive the contra line
    pub fn counterpart_class(self) -> Option<AccountClass> {
        match self {
            ContraRule::NoContra => None,
            ContraRule::Revenue => Some(AccountClass::Revenue),
            ContraRule::SettleLiability => Some(AccountClass::Liability),
            ContraRule::Expense => Some(AccountClass::Expense),
        }
    }

    /// Side on which the contra line is posted
    pub fn side(self) -> Option<EntrySide> {
        match self {
            ContraRule::NoContra => None,
            ContraRule::Revenue => Some(EntrySide::Credit),
            ContraRule::SettleLiability | ContraRule::Expense => Some(EntrySide::Debit),
        }
    }

    /// Explicit account reference carried by the event for this rule
    pub fn explicit_reference(self, event: &CashEvent) -> Option<&AccountId> {
        match self {
            ContraRule::SettleLiability => event.explicit_liability_account_id.as_ref(),
            ContraRule::Expense => event.explicit_expense_account_id.as_ref(),
            ContraRule::NoContra | ContraRule::Revenue => None,
        }
    }

    /// Prefix used to describe the contra line (`"sale: {description}"`)
    pub fn description_prefix(self) -> &'static str {
        match self {
            ContraRule::NoContra => "",
            ContraRule::Revenue => "sale",
            ContraRule::SettleLiability => "payable",
            ContraRule::Expense => "expense",
        }
    }
}

/// Business reason attached to a cash movement
///
/// This is a closed set. Parsing accepts both the snake_case names below and
/// the store's native reason codes (e.g. `orderan`, `pengeluaran`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashReason {
    Sale,
    ManualCashIn,
    AdvanceSettlement,
    ReceivablePayment,
    TransferIn,
    Expense,
    AdvanceWithdrawal,
    PayablePayment,
    /// Payment against a purchase order; booked like [`CashReason::PayablePayment`]
    PurchaseOrderPayment,
    ManualCashOut,
    Payroll,
    TransferOut,
}

impl CashReason {
    pub const ALL: [CashReason; 12] = [
        CashReason::Sale,
        CashReason::ManualCashIn,
        CashReason::AdvanceSettlement,
        CashReason::ReceivablePayment,
        CashReason::TransferIn,
        CashReason::Expense,
        CashReason::AdvanceWithdrawal,
        CashReason::PayablePayment,
        CashReason::PurchaseOrderPayment,
        CashReason::ManualCashOut,
        CashReason::Payroll,
        CashReason::TransferOut,
    ];

    pub fn direction(self) -> FlowDirection {
        match self {
            CashReason::Sale
            | CashReason::ManualCashIn
            | CashReason::AdvanceSettlement
            | CashReason::ReceivablePayment
            | CashReason::TransferIn => FlowDirection::Inflow,
            CashReason::Expense
            | CashReason::AdvanceWithdrawal
            | CashReason::PayablePayment
            | CashReason::PurchaseOrderPayment
            | CashReason::ManualCashOut
            | CashReason::Payroll
            | CashReason::TransferOut => FlowDirection::Outflow,
        }
    }

    /// Contra-posting rule for this reason
    pub fn contra_rule(self) -> ContraRule {
        match self {
            CashReason::Sale => ContraRule::Revenue,
            CashReason::PayablePayment | CashReason::PurchaseOrderPayment => {
                ContraRule::SettleLiability
            }
            CashReason::Expense
            | CashReason::AdvanceWithdrawal
            | CashReason::ManualCashOut
            | CashReason::Payroll => ContraRule::Expense,
            CashReason::ManualCashIn
            | CashReason::AdvanceSettlement
            | CashReason::ReceivablePayment
            | CashReason::TransferIn
            | CashReason::TransferOut => ContraRule::NoContra,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CashReason::Sale => "sale",
            CashReason::ManualCashIn => "manual_cash_in",
            CashReason::AdvanceSettlement => "advance_settlement",
            CashReason::ReceivablePayment => "receivable_payment",
            CashReason::TransferIn => "transfer_in",
            CashReason::Expense => "expense",
            CashReason::AdvanceWithdrawal => "advance_withdrawal",
            CashReason::PayablePayment => "payable_payment",
            CashReason::PurchaseOrderPayment => "purchase_order_payment",
            CashReason::ManualCashOut => "manual_cash_out",
            CashReason::Payroll => "payroll",
            CashReason::TransferOut => "transfer_out",
        }
    }

    /// Human-readable label for report exports
    ///
    /// Cosmetic only; not part of the engine's correctness contract.
    pub fn label(self) -> &'static str {
        match self {
            CashReason::Sale => "Penjualan",
            CashReason::ManualCashIn => "Kas Masuk Manual",
            CashReason::AdvanceSettlement => "Pelunasan Panjar",
            CashReason::ReceivablePayment => "Pembayaran Piutang",
            CashReason::TransferIn => "Transfer Masuk",
            CashReason::Expense => "Pengeluaran",
            CashReason::AdvanceWithdrawal => "Panjar Karyawan",
            CashReason::PayablePayment => "Bayar Hutang",
            CashReason::PurchaseOrderPayment => "Pembayaran PO",
            CashReason::ManualCashOut => "Kas Keluar Manual",
            CashReason::Payroll => "Gaji Karyawan",
            CashReason::TransferOut => "Transfer Keluar",
        }
    }
}

impl fmt::Display for CashReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CashReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let reason = match normalized.as_str() {
            "sale" | "orderan" | "pos_direct" => CashReason::Sale,
            "manual_cash_in" | "kas_masuk_manual" => CashReason::ManualCashIn,
            "advance_settlement" | "panjar_pelunasan" => CashReason::AdvanceSettlement,
            "receivable_payment" | "pembayaran_piutang" | "receivables_payment" => {
                CashReason::ReceivablePayment
            }
            "transfer_in" | "transfer_masuk" => CashReason::TransferIn,
            "expense" | "pengeluaran" | "manual_expense" => CashReason::Expense,
            "advance_withdrawal" | "panjar_pengambilan" | "employee_advance" => {
                CashReason::AdvanceWithdrawal
            }
            "payable_payment" | "pembayaran_hutang" => CashReason::PayablePayment,
            "purchase_order_payment" | "po_payment" | "pembayaran_po" => {
                CashReason::PurchaseOrderPayment
            }
            "manual_cash_out" | "kas_keluar_manual" => CashReason::ManualCashOut,
            "payroll" | "gaji_karyawan" | "pembayaran_gaji" => CashReason::Payroll,
            "transfer_out" | "transfer_keluar" => CashReason::TransferOut,
            _ => return Err(format!("unknown cash reason: '{}'", s.trim())),
        };
        Ok(reason)
    }
}

/// Single-sided cash-movement event
///
/// Events are immutable and append-only; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashEvent {
    pub id: EventId,

    /// Cash (or bank) account the money moved through
    pub account_id: AccountId,

    pub branch_id: Option<BranchId>,

    /// Declared business reason
    pub reason: CashReason,

    /// Originating subsystem tag; transfer tags override `reason`
    pub source_type: Option<String>,

    /// Strictly positive amount
    pub amount: Decimal,

    pub timestamp: DateTime<Utc>,

    pub description: String,

    /// Human-readable name or external id of the source document
    pub reference: String,

    /// Liability to debit for payable/PO payments
    pub explicit_liability_account_id: Option<AccountId>,

    /// Expense account to debit for expense-class outflows
    pub explicit_expense_account_id: Option<AccountId>,
}

impl CashEvent {
    pub fn new(
        id: impl Into<EventId>,
        account_id: impl Into<AccountId>,
        reason: CashReason,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        CashEvent {
            id: id.into(),
            account_id: account_id.into(),
            branch_id: None,
            reason,
            source_type: None,
            amount,
            timestamp,
            description: String::new(),
            reference: String::new(),
            explicit_liability_account_id: None,
            explicit_expense_account_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<BranchId>) -> Self {
        self.branch_id = Some(branch.into());
        self
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn with_liability_account(mut self, account_id: impl Into<AccountId>) -> Self {
        self.explicit_liability_account_id = Some(account_id.into());
        self
    }

    pub fn with_expense_account(mut self, account_id: impl Into<AccountId>) -> Self {
        self.explicit_expense_account_id = Some(account_id.into());
        self
    }

    /// Reason used for classification
    ///
    /// A transfer `source_type` wins over the declared reason, since the store
    /// records both legs of an inter-account transfer with the transfer tag.
    pub fn effective_reason(&self) -> CashReason {
        match self.source_type.as_deref().map(str::trim) {
            Some("transfer_in") | Some("transfer_masuk") => CashReason::TransferIn,
            Some("transfer_out") | Some("transfer_keluar") => CashReason::TransferOut,
            _ => self.reason,
        }
    }
}
