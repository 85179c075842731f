//! Entry synthesis
//!
//! Turns one single-sided cash event into double-entry ledger lines: one line
//! on the cash account and, when a contra account resolves, one offsetting
//! line on the contra account. Both lines carry the event's reference and
//! reason for traceability.

use crate::core::policy::ResolutionMode;
use crate::core::resolver::ContraResolver;
use crate::types::{Account, AccountId, CashEvent, LedgerLine, LedgerWarning};
use tracing::warn;

/// Lines produced for one event, plus the anomaly met while producing them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Synthesis {
    /// `(account id, line)` pairs, cash side first
    pub postings: Vec<(AccountId, LedgerLine)>,
    pub warning: Option<LedgerWarning>,
}

impl Synthesis {
    fn skipped(warning: LedgerWarning) -> Self {
        Synthesis {
            postings: Vec::new(),
            warning: Some(warning),
        }
    }
}

/// Synthesize the ledger lines for a single event
///
/// # Arguments
///
/// * `event` - The cash event to expand
/// * `accounts` - Chart of accounts visible to the report
/// * `resolver` - Contra-account resolver carrying the deployment policy
///
/// # Returns
///
/// * Cash line plus contra line when the contra account resolves
/// * Cash line only (with `UnresolvedContra`) in lenient mode when it does not
/// * Nothing (with `RejectedUnbalanced`) in strict mode when it does not
/// * Nothing (with `MalformedEvent`) when the cash account is unknown
/// * Cash line only for transfers and the remaining inflows, which have no
///   contra rule
pub fn synthesize(event: &CashEvent, accounts: &[Account], resolver: &ContraResolver) -> Synthesis {
    if !accounts.iter().any(|account| account.id == event.account_id) {
        let warning = LedgerWarning::MalformedEvent {
            event_id: event.id.clone(),
            account_id: event.account_id.clone(),
        };
        warn!(event_id = %event.id, account_id = %event.account_id, "{}", warning);
        return Synthesis::skipped(warning);
    }

    let reason = event.effective_reason();
    let rule = reason.contra_rule();

    let cash_line = LedgerLine::posting(
        reason.direction().cash_side(),
        event.amount,
        event.timestamp,
        event.description.clone(),
        event.reference.clone(),
        reason,
        event.id.clone(),
    );
    let mut postings = vec![(event.account_id.clone(), cash_line)];

    // Transfers and the non-sale inflows stop at the cash line
    let Some(contra_side) = rule.side() else {
        return Synthesis {
            postings,
            warning: None,
        };
    };

    match resolver.resolve(event, accounts) {
        Some(contra) => {
            let contra_line = LedgerLine::posting(
                contra_side,
                event.amount,
                event.timestamp,
                format!("{}: {}", rule.description_prefix(), event.description),
                event.reference.clone(),
                reason,
                event.id.clone(),
            );
            postings.push((contra.id.clone(), contra_line));

            Synthesis {
                postings,
                warning: None,
            }
        }
        None => match resolver.policy().mode {
            ResolutionMode::Lenient => {
                let warning = LedgerWarning::UnresolvedContra {
                    event_id: event.id.clone(),
                    reason,
                };
                warn!(event_id = %event.id, %reason, "{}", warning);
                Synthesis {
                    postings,
                    warning: Some(warning),
                }
            }
            ResolutionMode::Strict => {
                let warning = LedgerWarning::RejectedUnbalanced {
                    event_id: event.id.clone(),
                    reason,
                };
                warn!(event_id = %event.id, %reason, "{}", warning);
                Synthesis::skipped(warning)
            }
        },
    }
}
