//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports
//! from posted journal lines:
//! - Income Statement
//! - Balance Sheet
//! - Trial Balance
//! - Chart of accounts roll-ups

pub mod error;
pub mod hierarchy;
pub mod service;
pub mod source;
pub mod types;


pub use error::ReportError;
pub use hierarchy::roll_up;
pub use service::ReportService;
pub use source::{InMemoryLedger, LedgerSnapshot, LedgerSource, PostedLine, SourceError};
pub use types::*;
