//! Integration tests for the journal lifecycle feeding the reports.
//!
//! Entries are balanced and posted through `JournalService`, stored in an
//! `InMemoryLedger`, then read back by the statement builders and the
//! electronic ledger exporter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use contab_core::ledger::{
    Account, Classification, CounterpartyType, EntryStatus, JournalEntry, JournalLine,
    JournalService, LedgerError,
};
use contab_core::ple::{PleBook, PleExporter};
use contab_core::reports::{InMemoryLedger, ReportOptions, ReportService};
use contab_shared::types::{AccountId, CounterpartyId, EntryTypeId, PeriodId};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

struct Books {
    ledger: InMemoryLedger,
    period: PeriodId,
    entry_type: EntryTypeId,
    cash: AccountId,
    receivables: AccountId,
    capital: AccountId,
    sales: AccountId,
    rent: AccountId,
}

fn books() -> Books {
    let cash = Account::new("10", "Cash", Classification::Asset);
    let receivables = Account::new("12", "Receivables", Classification::Asset).requiring_counterparty();
    let capital = Account::new("50", "Capital", Classification::Equity);
    let sales = Account::new("70", "Sales", Classification::Income);
    let rent = Account::new("63", "Rent", Classification::Expense);

    Books {
        cash: cash.id,
        receivables: receivables.id,
        capital: capital.id,
        sales: sales.id,
        rent: rent.id,
        ledger: InMemoryLedger::new([cash, receivables, capital, sales, rent], [], []),
        period: PeriodId::new(),
        entry_type: EntryTypeId::new(),
    }
}

/// Balances and posts an entry, storing the header and lines in the ledger.
fn post(
    books: &mut Books,
    number: u32,
    posting_date: NaiveDate,
    lines: &[(AccountId, Decimal, Decimal)],
) -> JournalEntry {
    let draft = JournalEntry::draft(books.period, books.entry_type, number, posting_date, "PEN", "Test entry");
    let lines: Vec<JournalLine> = lines
        .iter()
        .enumerate()
        .map(|(i, (account, debit, credit))| {
            let seq = u32::try_from(i + 1).unwrap();
            let mut line = JournalLine::debit(draft.id, seq, *account, *debit, "PEN");
            line.credit = *credit;
            line
        })
        .collect();

    let balanced = JournalService::balance(&draft, &lines, &books.ledger).unwrap();
    let posted = JournalService::post(&balanced, &lines, &books.ledger).unwrap();
    books.ledger.record(posted.clone(), lines);
    posted
}

#[test]
fn test_posted_entries_flow_into_statements() {
    let mut books = books();
    let (cash, capital, sales, rent) = (books.cash, books.capital, books.sales, books.rent);

    post(&mut books, 1, date(1, 2), &[(cash, dec!(5000), Decimal::ZERO), (capital, Decimal::ZERO, dec!(5000))]);
    post(&mut books, 2, date(3, 10), &[(cash, dec!(1000), Decimal::ZERO), (sales, Decimal::ZERO, dec!(1000))]);
    post(&mut books, 3, date(3, 12), &[(rent, dec!(300), Decimal::ZERO), (cash, Decimal::ZERO, dec!(300))]);

    let options = ReportOptions::default();

    let statement = ReportService::build_income_statement(&books.ledger, date(3, 1), date(3, 31), &options).unwrap();
    assert_eq!(statement.total_income, dec!(1000.00));
    assert_eq!(statement.total_expense, dec!(300.00));
    assert_eq!(statement.net_income, dec!(700.00));

    let sheet = ReportService::build_balance_sheet(&books.ledger, date(3, 31), &options).unwrap();
    assert_eq!(sheet.total_assets, dec!(5700.00));
    assert_eq!(sheet.verification, dec!(5000.00));
    assert_eq!(sheet.unclosed_result, dec!(700.00));
    assert!(!sheet.is_balanced);

    let folded = ReportOptions {
        fold_period_result: true,
        ..options.clone()
    };
    let sheet = ReportService::build_balance_sheet(&books.ledger, date(3, 31), &folded).unwrap();
    assert!(sheet.is_balanced);
    assert_eq!(sheet.total_equity, dec!(5700.00));

    let trial = ReportService::build_trial_balance(&books.ledger, date(3, 31), &options).unwrap();
    assert!(trial.is_balanced);
    assert_eq!(trial.total_debit, dec!(6300.00));
}

#[test]
fn test_voided_entry_drops_out_of_reports() {
    let mut books = books();
    let (cash, sales) = (books.cash, books.sales);

    post(&mut books, 1, date(3, 10), &[(cash, dec!(1000), Decimal::ZERO), (sales, Decimal::ZERO, dec!(1000))]);
    let mistake = post(&mut books, 2, date(3, 11), &[(cash, dec!(99), Decimal::ZERO), (sales, Decimal::ZERO, dec!(99))]);

    let voided = JournalService::void(&mistake).unwrap();
    books.ledger.upsert_entry(voided.clone());

    let statement =
        ReportService::build_income_statement(&books.ledger, date(3, 1), date(3, 31), &ReportOptions::default()).unwrap();
    assert_eq!(statement.total_income, dec!(1000.00));

    let lines = books.ledger.lines_of(voided.id);
    assert!(matches!(
        JournalService::balance(&voided, &lines, &books.ledger),
        Err(LedgerError::CannotModifyVoided)
    ));

    let exporter = PleExporter::new("20123456789", 1).unwrap();
    let export = exporter.export(&books.ledger, PleBook::Journal, 2026, 3).unwrap();
    assert_eq!(export.row_count, 2);
}

#[test]
fn test_counterparty_required_before_posting() {
    let books = books();
    let draft = JournalEntry::draft(books.period, books.entry_type, 1, date(4, 1), "PEN", "Credit sale");
    let missing = vec![
        JournalLine::debit(draft.id, 1, books.receivables, dec!(118), "PEN"),
        JournalLine::credit(draft.id, 2, books.sales, dec!(118), "PEN"),
    ];

    let err = JournalService::balance(&draft, &missing, &books.ledger).unwrap_err();
    let codes: Vec<(Option<usize>, &str)> = err.violations().iter().map(|v| (v.line, v.code())).collect();
    assert_eq!(codes, vec![(Some(1), "MISSING_COUNTERPARTY_TYPE")]);

    let complete = vec![
        JournalLine::debit(draft.id, 1, books.receivables, dec!(118), "PEN")
            .with_counterparty(CounterpartyType::Client, CounterpartyId::new()),
        JournalLine::credit(draft.id, 2, books.sales, dec!(118), "PEN"),
    ];
    let balanced = JournalService::balance(&draft, &complete, &books.ledger).unwrap();
    assert_eq!(balanced.status, EntryStatus::Balanced);
}
