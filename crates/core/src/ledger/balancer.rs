//! Journal entry balancing and validation.
//!
//! The balancer decides whether an entry is postable. It never mutates
//! storage and never fails on malformed input: every problem is reported as
//! a [`Violation`].

use contab_shared::types::{round_money, same_money};
use rust_decimal::Decimal;
use tracing::debug;

use super::account::AccountCatalog;
use super::journal::{JournalEntry, JournalLine};
use super::violation::{EntryValidation, Violation, ViolationKind};

/// Stateless journal entry balancer.
pub struct Balancer;

impl Balancer {
    /// Sums debits and credits across all lines.
    ///
    /// Both totals are rounded to the monetary scale using round-half-up.
    /// Returns `None` if either sum exceeds the decimal range.
    #[must_use]
    pub fn compute_totals(lines: &[JournalLine]) -> Option<(Decimal, Decimal)> {
        let total_debit = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.debit))?;
        let total_credit = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.credit))?;

        Some((round_money(total_debit), round_money(total_credit)))
    }

    /// Validates an entry's lines against the account catalog.
    ///
    /// Per line, in order:
    /// 1. Account exists and is active (then: allows direct posting)
    /// 2. Exactly one of debit/credit is positive
    /// 3. Neither amount is negative
    /// 4. A currency is present
    /// 5. Counterparty type, then id, when the account requires them
    /// 6. Cost center when the account requires it
    ///
    /// Then, for the entry as a whole, debit and credit totals must match.
    /// Totals that overflow yield `AmountOutOfRange` instead.
    #[must_use]
    pub fn validate<C>(entry: &JournalEntry, lines: &[JournalLine], catalog: &C) -> Vec<Violation>
    where
        C: AccountCatalog + ?Sized,
    {
        let mut violations = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            Self::validate_line(index + 1, line, catalog, &mut violations);
        }

        match Self::compute_totals(lines) {
            Some((total_debit, total_credit)) if !same_money(total_debit, total_credit) => {
                violations.push(Violation::header(ViolationKind::UnbalancedEntry {
                    total_debit,
                    total_credit,
                }));
            }
            Some(_) => {}
            None => violations.push(Violation::header(ViolationKind::AmountOutOfRange)),
        }

        debug!(
            entry_id = %entry.id,
            lines = lines.len(),
            violations = violations.len(),
            "journal entry validated"
        );

        violations
    }

    /// Validates an entry and reports totals alongside the outcome.
    #[must_use]
    pub fn validate_entry<C>(entry: &JournalEntry, lines: &[JournalLine], catalog: &C) -> EntryValidation
    where
        C: AccountCatalog + ?Sized,
    {
        let violations = Self::validate(entry, lines, catalog);
        let (total_debit, total_credit) =
            Self::compute_totals(lines).unwrap_or((Decimal::ZERO, Decimal::ZERO));

        EntryValidation {
            is_postable: violations.is_empty(),
            violations,
            total_debit,
            total_credit,
        }
    }

    fn validate_line<C>(line_no: usize, line: &JournalLine, catalog: &C, out: &mut Vec<Violation>)
    where
        C: AccountCatalog + ?Sized,
    {
        let account = catalog
            .account(line.account_id)
            .filter(|account| account.is_active());

        match account {
            None => out.push(Violation::at_line(
                line_no,
                ViolationKind::UnknownAccount {
                    account_id: line.account_id,
                },
            )),
            Some(account) if !account.allow_direct_posting => out.push(Violation::at_line(
                line_no,
                ViolationKind::AccountNotPostable {
                    account_id: line.account_id,
                },
            )),
            Some(_) => {}
        }

        if (line.debit > Decimal::ZERO) == (line.credit > Decimal::ZERO) {
            out.push(Violation::at_line(line_no, ViolationKind::BothSidesOrNeitherSide));
        }

        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            out.push(Violation::at_line(line_no, ViolationKind::NegativeAmount));
        }

        if !line.has_currency() {
            out.push(Violation::at_line(line_no, ViolationKind::MissingCurrency));
        }

        let Some(account) = account else {
            return;
        };

        if account.requires_counterparty {
            if line.counterparty_type.is_none() {
                out.push(Violation::at_line(line_no, ViolationKind::MissingCounterpartyType));
            } else if line.counterparty_id.is_none() {
                out.push(Violation::at_line(line_no, ViolationKind::MissingCounterpartyId));
            }
        }

        if account.requires_cost_center && line.cost_center_id.is_none() {
            out.push(Violation::at_line(line_no, ViolationKind::MissingCostCenter));
        }
    }
}
