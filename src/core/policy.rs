//! Default-account policy
//!
//! Deployment-level configuration that drives contra-account resolution:
//! which code suffix marks a header account, which leading code prefix is
//! conventional for each account class, and whether events that cannot be
//! balanced are kept (lenient) or rejected (strict).
//!
//! The policy is plain data. It can be loaded from a TOML file so that a
//! deployment overrides it without code changes:
//!
//! ```toml
//! header_suffix = "000"
//! mode = "lenient"
//!
//! [preferred_prefixes]
//! revenue = "4"
//! liability = "2"
//! expense = "6"
//! ```

use crate::types::{Account, AccountClass, LedgerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with an event whose contra account cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Keep the cash line, omit the contra line, record a warning
    #[default]
    Lenient,
    /// Drop the whole event, record a warning
    Strict,
}

/// Conventional leading code digit(s) per contra account class
///
/// Only the classes a contra rule can target carry a prefix. An empty string
/// disables the preference for that class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferredPrefixes {
    pub liability: String,
    pub revenue: String,
    pub expense: String,
}

impl Default for PreferredPrefixes {
    fn default() -> Self {
        PreferredPrefixes {
            liability: "2".to_string(),
            revenue: "4".to_string(),
            expense: "6".to_string(),
        }
    }
}

impl PreferredPrefixes {
    pub fn for_class(&self, class: AccountClass) -> Option<&str> {
        let prefix = match class {
            AccountClass::Liability => &self.liability,
            AccountClass::Revenue => &self.revenue,
            AccountClass::Expense => &self.expense,
            AccountClass::Asset | AccountClass::Equity => return None,
        };
        let prefix = prefix.trim();
        (!prefix.is_empty()).then_some(prefix)
    }
}

/// Contra-account resolution policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContraPolicy {
    /// Code suffix reserved for non-postable summary accounts; empty disables
    /// the suffix rule (explicit header flags still apply)
    pub header_suffix: String,

    pub preferred_prefixes: PreferredPrefixes,

    pub mode: ResolutionMode,
}

impl Default for ContraPolicy {
    fn default() -> Self {
        ContraPolicy {
            header_suffix: "000".to_string(),
            preferred_prefixes: PreferredPrefixes::default(),
            mode: ResolutionMode::Lenient,
        }
    }
}

impl ContraPolicy {
    /// Parse a policy from TOML text; absent keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, LedgerError> {
        toml::from_str(text).map_err(|e| LedgerError::config(e.to_string()))
    }

    /// Load a policy file
    pub fn from_path(path: &Path) -> Result<Self, LedgerError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether an account is a summary/group account and therefore never a
    /// contra candidate
    pub fn is_header(&self, account: &Account) -> bool {
        if account.is_header {
            return true;
        }
        let suffix = self.header_suffix.trim();
        !suffix.is_empty() && account.code.ends_with(suffix)
    }

    /// Whether an account's code carries the conventional prefix of its class
    pub fn is_preferred(&self, account: &Account) -> bool {
        self.preferred_prefixes
            .for_class(account.class)
            .is_some_and(|prefix| account.code.starts_with(prefix))
    }
}
