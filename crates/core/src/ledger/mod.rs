//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Chart of accounts and account lookup
//! - Journal entry headers and lines
//! - Entry balancing and validation
//! - Journal entry lifecycle (balance, post, void)
//! - Error types for ledger operations

pub mod account;
pub mod balancer;
pub mod error;
pub mod journal;
pub mod service;
pub mod violation;

#[cfg(test)]
mod balancer_props;

pub use account::{
    Account, AccountCatalog, AccountStatus, BalanceNature, ChartOfAccounts, Classification,
    HierarchyIssue,
};
pub use balancer::Balancer;
pub use error::LedgerError;
pub use journal::{CounterpartyType, EntryStatus, JournalEntry, JournalLine};
pub use service::JournalService;
pub use violation::{EntryValidation, Violation, ViolationKind};
