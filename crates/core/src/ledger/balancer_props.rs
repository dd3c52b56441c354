//! Property-based tests for journal entry balancing.
//!
//! - Balanced, well-formed entries produce no violations
//! - Unbalanced entries produce exactly one header violation with both totals
//! - Side and sign checks fire on the offending line regardless of the rest
//! - Totals are deterministic

use chrono::NaiveDate;
use contab_shared::types::{AccountId, EntryTypeId, PeriodId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::{Account, ChartOfAccounts, Classification};
use super::balancer::Balancer;
use super::journal::{JournalEntry, JournalLine};
use super::violation::ViolationKind;

/// Strategy to generate positive amounts from 0.01 to 100,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a list of positive amounts.
fn amounts(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..=max_len)
}

struct Books {
    chart: ChartOfAccounts,
    entry: JournalEntry,
    debit_account: AccountId,
    credit_account: AccountId,
}

fn books() -> Books {
    let cash = Account::new("10", "Cash", Classification::Asset);
    let sales = Account::new("70", "Sales", Classification::Income);
    Books {
        debit_account: cash.id,
        credit_account: sales.id,
        chart: ChartOfAccounts::new([cash, sales]),
        entry: JournalEntry::draft(
            PeriodId::new(),
            EntryTypeId::new(),
            1,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            "PEN",
            "Property entry",
        ),
    }
}

/// Builds debit lines followed by credit lines, numbered from 1.
fn build_lines(books: &Books, debits: &[Decimal], credits: &[Decimal]) -> Vec<JournalLine> {
    let mut lines = Vec::with_capacity(debits.len() + credits.len());
    for amount in debits {
        let seq = u32::try_from(lines.len() + 1).unwrap();
        lines.push(JournalLine::debit(books.entry.id, seq, books.debit_account, *amount, "PEN"));
    }
    for amount in credits {
        let seq = u32::try_from(lines.len() + 1).unwrap();
        lines.push(JournalLine::credit(books.entry.id, seq, books.credit_account, *amount, "PEN"));
    }
    lines
}

/// Adds a balancing amount to whichever side is short.
fn balance_sides(mut debits: Vec<Decimal>, mut credits: Vec<Decimal>) -> (Vec<Decimal>, Vec<Decimal>) {
    let debit_total: Decimal = debits.iter().sum();
    let credit_total: Decimal = credits.iter().sum();
    if debit_total > credit_total {
        credits.push(debit_total - credit_total);
    } else if credit_total > debit_total {
        debits.push(credit_total - debit_total);
    }
    (debits, credits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* entry where every line posts to exactly one side and the
    /// sides sum to the same total, validation SHALL return no violations.
    #[test]
    fn prop_balanced_entry_has_no_violations(
        debits in amounts(6),
        credits in amounts(6),
    ) {
        let books = books();
        let (debits, credits) = balance_sides(debits, credits);
        let lines = build_lines(&books, &debits, &credits);

        let result = Balancer::validate_entry(&books.entry, &lines, &books.chart);
        prop_assert!(result.violations.is_empty(), "got: {:?}", result.violations);
        prop_assert!(result.is_postable);
        prop_assert_eq!(result.total_debit, result.total_credit);
    }

    /// *For any* entry whose debit and credit sums differ, validation SHALL
    /// return exactly one UnbalancedEntry violation carrying both totals.
    #[test]
    fn prop_unbalanced_entry_has_one_header_violation(
        debits in amounts(6),
        credits in amounts(6),
        extra in positive_amount(),
    ) {
        let books = books();
        let (mut debits, credits) = balance_sides(debits, credits);
        debits[0] += extra;
        let lines = build_lines(&books, &debits, &credits);

        let expected_debit: Decimal = debits.iter().sum();
        let expected_credit: Decimal = credits.iter().sum();

        let violations = Balancer::validate(&books.entry, &lines, &books.chart);
        prop_assert_eq!(violations.len(), 1);
        prop_assert_eq!(violations[0].line, None);
        prop_assert_eq!(
            &violations[0].kind,
            &ViolationKind::UnbalancedEntry {
                total_debit: expected_debit,
                total_credit: expected_credit,
            }
        );
    }

    /// *For any* entry, a line posting to both sides SHALL be flagged at its
    /// own 1-based index regardless of the other lines.
    #[test]
    fn prop_both_sides_flagged_at_line(
        debits in amounts(5),
        credits in amounts(5),
        amount in positive_amount(),
        position in any::<prop::sample::Index>(),
    ) {
        let books = books();
        let mut lines = build_lines(&books, &debits, &credits);
        let index = position.index(lines.len());
        lines[index].debit = amount;
        lines[index].credit = amount;

        let violations = Balancer::validate(&books.entry, &lines, &books.chart);
        let flagged = violations
            .iter()
            .any(|v| v.line == Some(index + 1) && v.kind == ViolationKind::BothSidesOrNeitherSide);
        prop_assert!(flagged);
    }

    /// *For any* entry, a line with a negative amount SHALL yield
    /// NegativeAmount at its index, balanced or not.
    #[test]
    fn prop_negative_amount_flagged(
        debits in amounts(5),
        credits in amounts(5),
        amount in positive_amount(),
        position in any::<prop::sample::Index>(),
        on_debit in any::<bool>(),
    ) {
        let books = books();
        let (debits, credits) = balance_sides(debits, credits);
        let mut lines = build_lines(&books, &debits, &credits);
        let index = position.index(lines.len());
        if on_debit {
            lines[index].debit = -amount;
        } else {
            lines[index].credit = -amount;
        }

        let violations = Balancer::validate(&books.entry, &lines, &books.chart);
        let flagged = violations
            .iter()
            .any(|v| v.line == Some(index + 1) && v.kind == ViolationKind::NegativeAmount);
        prop_assert!(flagged);
    }

    /// *For any* line list, computing totals twice SHALL give identical results.
    #[test]
    fn prop_compute_totals_idempotent(
        debits in amounts(8),
        credits in amounts(8),
    ) {
        let books = books();
        let lines = build_lines(&books, &debits, &credits);

        let first = Balancer::compute_totals(&lines);
        let second = Balancer::compute_totals(&lines);
        prop_assert_eq!(first, second);
        let (total_debit, total_credit) = first.unwrap_or_default();
        prop_assert_eq!(total_debit, debits.iter().sum::<Decimal>());
        prop_assert_eq!(total_credit, credits.iter().sum::<Decimal>());
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Specific example: a line with both sides at zero.
    #[test]
    fn test_zero_line_example() {
        let books = books();
        let mut lines = build_lines(&books, &[Decimal::new(100, 2)], &[Decimal::new(100, 2)]);
        lines[1].credit = Decimal::ZERO;
        lines[0].debit = Decimal::ZERO;

        let violations = Balancer::validate(&books.entry, &lines, &books.chart);
        let flagged: Vec<Option<usize>> = violations
            .iter()
            .filter(|v| v.kind == ViolationKind::BothSidesOrNeitherSide)
            .map(|v| v.line)
            .collect();
        assert_eq!(flagged, vec![Some(1), Some(2)]);
    }

    /// Specific example: balance_sides helper closes the gap.
    #[test]
    fn test_balance_sides_helper() {
        let (debits, credits) = balance_sides(vec![Decimal::new(500, 2)], vec![Decimal::new(200, 2)]);
        assert_eq!(debits.iter().sum::<Decimal>(), credits.iter().sum::<Decimal>());
        assert_eq!(credits.len(), 2);
    }
}
