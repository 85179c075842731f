//! Running-balance computation for a single account

use crate::types::{AccountClass, LedgerLine};
use rust_decimal::Decimal;

/// Sort an account's lines by date and fold running balances over them
///
/// The sort is stable, so lines sharing a timestamp keep their insertion
/// order. The sign convention comes from the account class: debit-normal
/// classes grow on debit, credit-normal classes grow on credit.
///
/// # Arguments
///
/// * `class` - Class of the account the lines belong to
/// * `opening_balance` - Balance before the first line
/// * `lines` - Lines in insertion order
///
/// # Returns
///
/// The sorted lines with `running_balance` filled in, and the closing
/// balance (the opening balance when there are no lines)
pub fn compute_running_balances(
    class: AccountClass,
    opening_balance: Decimal,
    mut lines: Vec<LedgerLine>,
) -> (Vec<LedgerLine>, Decimal) {
    lines.sort_by_key(|line| line.date);

    let side = class.normal_side();
    let mut balance = opening_balance;
    for line in &mut lines {
        balance += side.movement(line.debit_amount, line.credit_amount);
        line.running_balance = balance;
    }

    (lines, balance)
}
