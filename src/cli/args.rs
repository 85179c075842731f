use crate::core::{parse_utc_offset, ContraPolicy, EventQuery, ResolutionMode};
use crate::strategy::{EngineConfig, LedgerRequest};
use crate::types::LedgerError;
use chrono::{FixedOffset, NaiveDate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Derive per-account double-entry ledgers from a cash-movement log
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Derive per-account double-entry ledgers from a cash-movement log", long_about = None)]
pub struct CliArgs {
    /// Chart of accounts export
    #[arg(long = "accounts", value_name = "FILE", help = "Path to accounts.csv")]
    pub accounts_file: PathBuf,

    /// Cash event log export
    #[arg(long = "events", value_name = "FILE", help = "Path to events.csv")]
    pub events_file: PathBuf,

    /// First day of the report, inclusive
    #[arg(long = "from", value_name = "YYYY-MM-DD")]
    pub from: NaiveDate,

    /// Last day of the report, inclusive
    #[arg(long = "to", value_name = "YYYY-MM-DD")]
    pub to: NaiveDate,

    /// Restrict the report to one branch
    #[arg(long = "branch", value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Default-account policy file
    #[arg(
        long = "policy",
        value_name = "FILE",
        help = "TOML file overriding the default-account policy"
    )]
    pub policy_file: Option<PathBuf>,

    /// Reject events whose contra account cannot be resolved
    #[arg(
        long = "strict",
        help = "Drop events that cannot be balanced instead of keeping their cash line"
    )]
    pub strict: bool,

    /// Reference UTC offset for day boundaries and naive timestamps
    #[arg(
        long = "utc-offset",
        value_name = "±HH:MM",
        default_value = "+00:00",
        allow_hyphen_values = true,
        value_parser = parse_utc_offset
    )]
    pub utc_offset: FixedOffset,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Maximum number of concurrent fold tasks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of per-account folds running concurrently (default: CPU cores)"
    )]
    pub max_concurrent_folds: Option<usize>,

    /// Deadline for the store reads (async mode only)
    #[arg(
        long = "timeout-secs",
        value_name = "SECONDS",
        help = "Abort the report if the store reads take longer than this"
    )]
    pub timeout_secs: Option<u64>,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create an EngineConfig from CLI arguments
    ///
    /// Falls back to defaults for values not given; zero values are replaced
    /// with defaults (with a warning) by `EngineConfig::new`.
    pub fn to_engine_config(&self) -> EngineConfig {
        if self.max_concurrent_folds.is_some() || self.timeout_secs.is_some() {
            let default = EngineConfig::default();
            EngineConfig::new(
                self.max_concurrent_folds
                    .unwrap_or(default.max_concurrent_folds),
                self.timeout_secs.map(Duration::from_secs),
            )
        } else {
            EngineConfig::default()
        }
    }

    /// Build the query from the date range, branch and offset
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidDateRange` if `--from` is after `--to`.
    pub fn to_query(&self) -> Result<EventQuery, LedgerError> {
        let query = EventQuery::new(self.from, self.to)?.with_offset(self.utc_offset);
        Ok(match &self.branch {
            Some(branch) => query.with_branch(branch.clone()),
            None => query,
        })
    }

    /// Load the policy file (or the defaults), then apply `--strict`
    pub fn load_policy(&self) -> Result<ContraPolicy, LedgerError> {
        let policy = match &self.policy_file {
            Some(path) => ContraPolicy::from_path(path)?,
            None => ContraPolicy::default(),
        };

        Ok(if self.strict {
            policy.with_mode(ResolutionMode::Strict)
        } else {
            policy
        })
    }

    /// Assemble the complete report request
    pub fn to_request(&self) -> Result<LedgerRequest, LedgerError> {
        Ok(LedgerRequest {
            accounts_path: self.accounts_file.clone(),
            events_path: self.events_file.clone(),
            query: self.to_query()?,
            policy: self.load_policy()?,
        })
    }
}
