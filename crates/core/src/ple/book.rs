//! Electronic ledger book kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Book that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PleBook {
    /// Libro Diario (format 5.1).
    Journal,
    /// Libro Mayor (format 6.1).
    GeneralLedger,
}

impl PleBook {
    /// Six-digit book code used in the file name.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Journal => "050100",
            Self::GeneralLedger => "060100",
        }
    }
}

impl fmt::Display for PleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Journal => write!(f, "journal"),
            Self::GeneralLedger => write!(f, "general_ledger"),
        }
    }
}

impl FromStr for PleBook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "journal" | "5.1" | "050100" => Ok(Self::Journal),
            "general_ledger" | "general-ledger" | "6.1" | "060100" => Ok(Self::GeneralLedger),
            other => Err(format!("unknown book '{other}'")),
        }
    }
}
