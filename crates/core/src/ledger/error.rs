//! Ledger error types for lifecycle and posting errors.
//!
//! Validation problems are not errors (see [`super::violation`]); they only
//! become one when a caller tries to move a rejected entry forward.

use contab_shared::AppError;
use thiserror::Error;

use super::journal::EntryStatus;
use super::violation::Violation;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// The entry has fewer than two lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// The entry failed validation.
    #[error("Journal entry has {} violation(s)", violations.len())]
    Rejected {
        /// Every violation found.
        violations: Vec<Violation>,
    },

    // ========== State Errors ==========
    /// The requested status change is not allowed.
    #[error("Cannot move journal entry from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    /// Cannot modify a posted entry.
    #[error("Cannot modify posted journal entry")]
    CannotModifyPosted,

    /// Cannot modify a voided entry.
    #[error("Cannot modify voided journal entry")]
    CannotModifyVoided,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Rejected { .. } => "ENTRY_REJECTED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CannotModifyVoided => "CANNOT_MODIFY_VOIDED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines | Self::Rejected { .. } => 400,

            // 409 Conflict - state errors
            Self::InvalidTransition { .. } | Self::CannotModifyPosted | Self::CannotModifyVoided => {
                409
            }
        }
    }

    /// Returns the violations carried by a rejection.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Rejected { violations } => violations,
            _ => &[],
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientLines | LedgerError::Rejected { .. } => {
                Self::Validation(err.to_string())
            }
            LedgerError::InvalidTransition { .. }
            | LedgerError::CannotModifyPosted
            | LedgerError::CannotModifyVoided => Self::BusinessRule(err.to_string()),
        }
    }
}
