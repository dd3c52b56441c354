//! Core accounting logic for Contab.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Journal validation, financial statements and the electronic ledger export
//! all operate on data already fetched into memory.
//!
//! # Modules
//!
//! - `ledger` - Chart of accounts, journal entries and entry balancing
//! - `reports` - Income statement, balance sheet, trial balance and roll-ups
//! - `ple` - Pipe-delimited electronic ledger books for the tax authority

pub mod ledger;
pub mod ple;
pub mod reports;
