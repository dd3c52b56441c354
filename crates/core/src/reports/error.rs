//! Report error types.

use chrono::NaiveDate;
use contab_shared::AppError;
use thiserror::Error;

use super::source::SourceError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// A sum over the selected lines exceeds the decimal range.
    #[error("Amounts out of range while totaling {0}")]
    AmountOutOfRange(&'static str),

    /// The ledger source could not supply lines.
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::AmountOutOfRange(_) => 422,
            Self::SourceUnavailable(_) => 503,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            ReportError::AmountOutOfRange(_) => Self::BusinessRule(err.to_string()),
            ReportError::SourceUnavailable(_) => Self::DataSource(err.to_string()),
        }
    }
}
