//! Electronic ledger export errors.

use contab_shared::AppError;
use thiserror::Error;

use crate::reports::SourceError;

/// Errors that can occur while exporting an electronic ledger book.
#[derive(Debug, Error)]
pub enum PleError {
    /// No taxpayer id was configured.
    #[error("Taxpayer id is not configured")]
    MissingTaxpayerId,

    /// Taxpayer id is not an 11-digit RUC.
    #[error("Invalid taxpayer id '{0}': expected 11 digits")]
    InvalidTaxpayerId(String),

    /// Year/month does not form a valid period.
    #[error("Invalid period {year}-{month:02}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// The ledger source could not supply lines.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl PleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingTaxpayerId => "MISSING_TAXPAYER_ID",
            Self::InvalidTaxpayerId(_) => "INVALID_TAXPAYER_ID",
            Self::InvalidMonth { .. } => "INVALID_PERIOD",
            Self::Source(_) => "SOURCE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingTaxpayerId => 500,
            Self::InvalidTaxpayerId(_) | Self::InvalidMonth { .. } => 400,
            Self::Source(_) => 503,
        }
    }
}

impl From<PleError> for AppError {
    fn from(err: PleError) -> Self {
        match err {
            PleError::MissingTaxpayerId => Self::Configuration(err.to_string()),
            PleError::InvalidTaxpayerId(_) | PleError::InvalidMonth { .. } => {
                Self::Validation(err.to_string())
            }
            PleError::Source(_) => Self::DataSource(err.to_string()),
        }
    }
}
