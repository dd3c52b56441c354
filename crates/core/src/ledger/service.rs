//! Journal service for the entry lifecycle.
//!
//! Moves entries through Draft → Balanced → Posted and marks them Voided.
//! Every forward step re-runs the balancer, so an entry validated on the
//! client is validated again before it is committed.

use tracing::{debug, warn};

use super::account::AccountCatalog;
use super::balancer::Balancer;
use super::error::LedgerError;
use super::journal::{EntryStatus, JournalEntry, JournalLine};

/// Journal service for entry state transitions.
///
/// This service contains pure business logic with no database dependencies.
/// It returns the updated header; persisting it is the caller's job.
pub struct JournalService;

impl JournalService {
    /// Validates an editable entry and returns it as Balanced with totals stamped.
    ///
    /// # Errors
    ///
    /// - `InsufficientLines` if fewer than two lines are given
    /// - `Rejected` with every violation if validation fails
    /// - `CannotModifyPosted` / `CannotModifyVoided` for immutable entries
    pub fn balance<C>(
        entry: &JournalEntry,
        lines: &[JournalLine],
        catalog: &C,
    ) -> Result<JournalEntry, LedgerError>
    where
        C: AccountCatalog + ?Sized,
    {
        Self::validate_can_modify(entry.status)?;

        if lines.len() < 2 {
            return Err(LedgerError::InsufficientLines);
        }

        let validation = Balancer::validate_entry(entry, lines, catalog);
        if !validation.is_postable {
            debug!(entry_id = %entry.id, violations = validation.violations.len(), "entry rejected");
            return Err(LedgerError::Rejected {
                violations: validation.violations,
            });
        }

        Ok(JournalEntry {
            total_debit: validation.total_debit,
            total_credit: validation.total_credit,
            status: EntryStatus::Balanced,
            ..entry.clone()
        })
    }

    /// Commits a Balanced entry.
    ///
    /// The lines are validated again since they may have been stored
    /// separately from the header.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the entry is Balanced
    /// - `Rejected` if the lines no longer validate
    pub fn post<C>(
        entry: &JournalEntry,
        lines: &[JournalLine],
        catalog: &C,
    ) -> Result<JournalEntry, LedgerError>
    where
        C: AccountCatalog + ?Sized,
    {
        if entry.status != EntryStatus::Balanced {
            warn!(entry_id = %entry.id, status = ?entry.status, "refusing to post entry");
            return Err(LedgerError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Posted,
            });
        }

        let balanced = Self::balance(entry, lines, catalog)?;

        Ok(JournalEntry {
            status: EntryStatus::Posted,
            ..balanced
        })
    }

    /// Voids an entry (logical delete).
    ///
    /// The entry keeps its lines; they simply stop counting in reports.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the entry is already voided.
    pub fn void(entry: &JournalEntry) -> Result<JournalEntry, LedgerError> {
        if entry.status == EntryStatus::Voided {
            warn!(entry_id = %entry.id, "entry already voided");
            return Err(LedgerError::InvalidTransition {
                from: EntryStatus::Voided,
                to: EntryStatus::Voided,
            });
        }

        Ok(JournalEntry {
            status: EntryStatus::Voided,
            ..entry.clone()
        })
    }

    /// Validate that an entry can be modified.
    ///
    /// # Errors
    ///
    /// Returns error if the entry is posted or voided.
    pub fn validate_can_modify(status: EntryStatus) -> Result<(), LedgerError> {
        match status {
            EntryStatus::Posted => Err(LedgerError::CannotModifyPosted),
            EntryStatus::Voided => Err(LedgerError::CannotModifyVoided),
            EntryStatus::Draft | EntryStatus::Balanced => Ok(()),
        }
    }
}
