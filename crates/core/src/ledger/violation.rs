//! Validation outcomes for journal entries.
//!
//! Violations are data returned to the caller, never raised as errors.

use contab_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a journal entry cannot be posted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// The account does not exist or is inactive.
    #[error("Account {account_id} does not exist or is inactive")]
    UnknownAccount {
        /// Referenced account.
        account_id: AccountId,
    },

    /// The account only groups other accounts.
    #[error("Account {account_id} does not allow direct posting")]
    AccountNotPostable {
        /// Referenced account.
        account_id: AccountId,
    },

    /// The line posts to both sides or to neither.
    #[error("Line must have exactly one of debit or credit greater than zero")]
    BothSidesOrNeitherSide,

    /// A debit or credit amount is negative.
    #[error("Line amounts cannot be negative")]
    NegativeAmount,

    /// The line has no currency.
    #[error("Line currency is required")]
    MissingCurrency,

    /// The account requires a counterparty and none was given.
    #[error("Account requires a counterparty type")]
    MissingCounterpartyType,

    /// A counterparty type was given without its id.
    #[error("Account requires a counterparty id")]
    MissingCounterpartyId,

    /// The account requires a cost center and none was given.
    #[error("Account requires a cost center")]
    MissingCostCenter,

    /// Debits and credits differ at the monetary scale.
    #[error("Entry is not balanced. Debit: {total_debit}, Credit: {total_credit}")]
    UnbalancedEntry {
        /// Total debit.
        total_debit: Decimal,
        /// Total credit.
        total_credit: Decimal,
    },

    /// Summing the line amounts exceeds the representable decimal range.
    #[error("Entry totals are out of range")]
    AmountOutOfRange,
}

impl ViolationKind {
    /// Returns the machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownAccount { .. } => "UNKNOWN_ACCOUNT",
            Self::AccountNotPostable { .. } => "ACCOUNT_NOT_POSTABLE",
            Self::BothSidesOrNeitherSide => "BOTH_SIDES_OR_NEITHER_SIDE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::MissingCurrency => "MISSING_CURRENCY",
            Self::MissingCounterpartyType => "MISSING_COUNTERPARTY_TYPE",
            Self::MissingCounterpartyId => "MISSING_COUNTERPARTY_ID",
            Self::MissingCostCenter => "MISSING_COST_CENTER",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

/// A single violation, tied to a line or to the entry as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// 1-based line number, or `None` for header-level violations.
    pub line: Option<usize>,
    /// What is wrong.
    pub kind: ViolationKind,
}

impl Violation {
    /// Creates a violation for a 1-based line number.
    #[must_use]
    pub const fn at_line(line: usize, kind: ViolationKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }

    /// Creates a header-level violation.
    #[must_use]
    pub const fn header(kind: ViolationKind) -> Self {
        Self { line: None, kind }
    }

    /// Returns the machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.kind),
            None => write!(f, "entry: {}", self.kind),
        }
    }
}

/// Result of validating a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryValidation {
    /// All violations found, in line order with header violations last.
    pub violations: Vec<Violation>,
    /// True if there are no violations.
    pub is_postable: bool,
    /// Total debit at the monetary scale (zero when out of range).
    pub total_debit: Decimal,
    /// Total credit at the monetary scale (zero when out of range).
    pub total_credit: Decimal,
}
