//! Parallel per-account folds
//!
//! Once grouping has produced one `(account, lines)` slot per account, every
//! slot can be folded on its own: an account's running balance depends only
//! on its own lines. This module spreads the slots over tokio tasks.
//!
//! # Design
//!
//! Slots are cut into at most `max_concurrent` contiguous chunks and each
//! chunk is folded sequentially inside one spawned task. Tasks are awaited in
//! spawn order, so the folded ledgers come back in slot order and the result
//! is identical to a sequential fold.

use crate::core::assembler::LedgerAssembler;
use crate::types::{Account, AccountLedger, LedgerError, LedgerLine};

/// One account with the lines grouped onto it
pub type Slot = (Account, Vec<LedgerLine>);

/// Fold every slot, using up to `max_concurrent` tasks
///
/// # Arguments
///
/// * `slots` - Output of the grouping phase
/// * `max_concurrent` - Upper bound on spawned tasks (zero is treated as one)
///
/// # Returns
///
/// * `Ok(Vec<AccountLedger>)` in the same order as `slots`
/// * `Err(LedgerError::Runtime)` if a fold task panicked or was cancelled
pub async fn fold_parallel(
    slots: Vec<Slot>,
    max_concurrent: usize,
) -> Result<Vec<AccountLedger>, LedgerError> {
    if slots.is_empty() {
        return Ok(Vec::new());
    }

    let total = slots.len();
    let workers = max_concurrent.max(1);
    let chunk_size = total.div_ceil(workers);

    let mut tasks = Vec::with_capacity(workers);
    let mut remaining = slots.into_iter().peekable();
    while remaining.peek().is_some() {
        let chunk: Vec<Slot> = remaining.by_ref().take(chunk_size).collect();
        tasks.push(tokio::spawn(async move {
            chunk
                .into_iter()
                .map(|(account, lines)| LedgerAssembler::fold_account(account, lines))
                .collect::<Vec<_>>()
        }));
    }

    let mut ledgers = Vec::with_capacity(total);
    for task in tasks {
        let folded = task
            .await
            .map_err(|e| LedgerError::runtime(format!("fold task failed: {}", e)))?;
        ledgers.extend(folded);
    }

    Ok(ledgers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountClass, CashReason, EntrySide};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn slots(count: usize) -> Vec<Slot> {
        (0..count)
            .map(|i| {
                let account = Account::new(
                    format!("acc-{i}"),
                    format!("{}", 1100 + i),
                    "Kas",
                    AccountClass::Asset,
                );
                let lines = vec![
                    LedgerLine::posting(
                        EntrySide::Debit,
                        dec!(10),
                        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                        "b",
                        "",
                        CashReason::Sale,
                        "e2",
                    ),
                    LedgerLine::posting(
                        EntrySide::Credit,
                        dec!(3),
                        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                        "a",
                        "",
                        CashReason::Expense,
                        "e1",
                    ),
                ];
                (account, lines)
            })
            .collect()
    }

    fn sequential(slots: Vec<Slot>) -> Vec<AccountLedger> {
        slots
            .into_iter()
            .map(|(account, lines)| LedgerAssembler::fold_account(account, lines))
            .collect()
    }

    #[rstest]
    #[case::single_worker(7, 1)]
    #[case::fewer_slots_than_workers(3, 8)]
    #[case::uneven_chunks(10, 4)]
    #[case::zero_workers(5, 0)]
    #[tokio::test]
    async fn test_matches_sequential_fold(#[case] count: usize, #[case] workers: usize) {
        let parallel = fold_parallel(slots(count), workers).await.unwrap();
        assert_eq!(parallel, sequential(slots(count)));
    }

    #[tokio::test]
    async fn test_empty_input() {
        assert!(fold_parallel(Vec::new(), 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_fold_sorts_its_own_lines() {
        let ledgers = fold_parallel(slots(2), 2).await.unwrap();
        for ledger in ledgers {
            assert_eq!(ledger.lines[0].event_id, "e1");
            assert_eq!(ledger.lines[0].running_balance, dec!(-3));
            assert_eq!(ledger.closing_balance, dec!(7));
        }
    }
}
