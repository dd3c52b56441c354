//! Contab reporter
//!
//! Runs entry validation, financial statements and electronic ledger export
//! over a JSON ledger snapshot and prints the result as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use contab_core::ledger::{Balancer, EntryStatus, EntryValidation, HierarchyIssue};
use contab_core::ple::{PleBook, PleExporter};
use contab_core::reports::{InMemoryLedger, LedgerSnapshot, ReportOptions, ReportService};
use contab_shared::{AppConfig, AppError};
use contab_shared::types::JournalEntryId;

#[derive(Parser, Debug)]
#[command(name = "contab")]
#[command(version)]
#[command(about = "Journal validation, financial statements and electronic ledgers", long_about = None)]
struct Args {
    /// Ledger snapshot with `accounts`, `entries` and `lines`
    #[arg(short, long, default_value = "ledger.json")]
    ledger: PathBuf,

    /// Configuration file layered over `config/default`
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every non-voided entry; fails if any entry has violations
    Validate,
    /// Income statement for an inclusive date range
    IncomeStatement {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Also print subtotals per parent account
        #[arg(long)]
        roll_up: bool,
    },
    /// Balance sheet as of a date
    BalanceSheet {
        #[arg(long)]
        as_of: NaiveDate,
        /// Fold the unclosed period result into equity
        #[arg(long)]
        fold_period_result: bool,
        /// Also print subtotals per parent account
        #[arg(long)]
        roll_up: bool,
    },
    /// Debit and credit sums per account as of a date
    TrialBalance {
        #[arg(long)]
        as_of: NaiveDate,
    },
    /// Electronic ledger book for a calendar month
    Ple {
        /// `journal` (5.1) or `general-ledger` (6.1)
        #[arg(long, default_value = "journal")]
        book: PleBook,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Taxpayer id, overriding `ple.taxpayer_id`
        #[arg(long)]
        ruc: Option<String>,
        /// Directory to write the book file into; prints the file otherwise
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct EntryReport {
    entry_id: JournalEntryId,
    number: u32,
    posting_date: NaiveDate,
    status: EntryStatus,
    #[serde(flatten)]
    validation: EntryValidation,
}

#[derive(Serialize)]
struct ValidationReport {
    entries: Vec<EntryReport>,
    rejected: usize,
    chart_issues: Vec<HierarchyIssue>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::load_with(args.config.as_deref()).map_err(AppError::from)?;
    init_tracing(&config);

    let snapshot = read_snapshot(&args.ledger)?;
    let ledger = InMemoryLedger::from_snapshot(snapshot);
    info!(
        path = %args.ledger.display(),
        accounts = ledger.chart().len(),
        entries = ledger.entries().len(),
        "ledger loaded"
    );

    let mut options = ReportOptions::from(&config);

    match args.command {
        Command::Validate => {
            let report = validate_all(&ledger);
            print_json(&report)?;
            if report.rejected > 0 {
                bail!("{} entries have violations", report.rejected);
            }
        }
        Command::IncomeStatement { from, to, roll_up } => {
            let statement = ReportService::build_income_statement(&ledger, from, to, &options).map_err(reject)?;
            if roll_up {
                let rows: Vec<_> = statement
                    .income_rows
                    .iter()
                    .chain(&statement.expense_rows)
                    .cloned()
                    .collect();
                let rolled = ReportService::roll_up(&rows, ledger.chart()).map_err(reject)?;
                print_json(&serde_json::json!({ "statement": statement, "roll_up": rolled }))?;
            } else {
                print_json(&statement)?;
            }
        }
        Command::BalanceSheet {
            as_of,
            fold_period_result,
            roll_up,
        } => {
            options.fold_period_result |= fold_period_result;
            let sheet = ReportService::build_balance_sheet(&ledger, as_of, &options).map_err(reject)?;
            if !sheet.is_balanced {
                warn!(difference = %sheet.difference(), "assets differ from liabilities plus equity");
            }
            if roll_up {
                let rows: Vec<_> = sheet
                    .asset_rows
                    .iter()
                    .chain(&sheet.liability_rows)
                    .chain(&sheet.equity_rows)
                    .cloned()
                    .collect();
                let rolled = ReportService::roll_up(&rows, ledger.chart()).map_err(reject)?;
                print_json(&serde_json::json!({ "statement": sheet, "roll_up": rolled }))?;
            } else {
                print_json(&sheet)?;
            }
        }
        Command::TrialBalance { as_of } => {
            let trial = ReportService::build_trial_balance(&ledger, as_of, &options).map_err(reject)?;
            print_json(&trial)?;
        }
        Command::Ple {
            book,
            year,
            month,
            ruc,
            out,
        } => {
            let exporter = match ruc {
                Some(ruc) => PleExporter::new(ruc, config.ple.currency_indicator),
                None => PleExporter::from_config(&config.ple),
            }
            .map_err(reject)?;
            let export = exporter.export(&ledger, book, year, month).map_err(reject)?;

            match out {
                Some(dir) => {
                    let path = dir.join(&export.file_name);
                    fs::write(&path, &export.content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), rows = export.row_count, "book written");
                    print_json(&serde_json::json!({
                        "file_name": export.file_name,
                        "path": path,
                        "row_count": export.row_count,
                    }))?;
                }
                None => {
                    io::stdout().lock().write_all(export.content.as_bytes())?;
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let json = config.logging.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(io::stderr)))
        .init();
}

fn read_snapshot(path: &Path) -> anyhow::Result<LedgerSnapshot> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn validate_all(ledger: &InMemoryLedger) -> ValidationReport {
    let entries: Vec<EntryReport> = ledger
        .entries()
        .into_iter()
        .filter(|entry| entry.status != EntryStatus::Voided)
        .map(|entry| {
            let lines = ledger.lines_of(entry.id);
            EntryReport {
                entry_id: entry.id,
                number: entry.number,
                posting_date: entry.posting_date,
                status: entry.status,
                validation: Balancer::validate_entry(entry, &lines, ledger),
            }
        })
        .collect();

    let rejected = entries.iter().filter(|e| !e.validation.is_postable).count();
    if rejected > 0 {
        warn!(rejected, "entries with violations");
    }

    ValidationReport {
        entries,
        rejected,
        chart_issues: ledger.chart().hierarchy_issues(),
    }
}

/// Logs a domain error with its code before handing it to anyhow.
fn reject(err: impl Into<AppError>) -> anyhow::Error {
    let err = err.into();
    error!(code = err.error_code(), status = err.status_code(), "{err}");
    anyhow::Error::new(err)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contab_core::ledger::{Account, Classification, JournalEntry, JournalLine};
    use contab_shared::types::{EntryTypeId, PeriodId};
    use rust_decimal_macros::dec;

    fn entry(number: u32, day: u32, status: EntryStatus) -> JournalEntry {
        let posting_date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        JournalEntry {
            status,
            ..JournalEntry::draft(PeriodId::new(), EntryTypeId::new(), number, posting_date, "PEN", "Venta")
        }
    }

    /// One balanced entry, one unbalanced draft and one voided unbalanced entry.
    fn snapshot() -> LedgerSnapshot {
        let cash = Account::new("10", "Caja", Classification::Asset);
        let sales = Account::new("70", "Ventas", Classification::Income);
        let posted = entry(1, 2, EntryStatus::Posted);
        let draft = entry(2, 3, EntryStatus::Draft);
        let voided = entry(3, 4, EntryStatus::Voided);

        let lines = vec![
            JournalLine::debit(posted.id, 1, cash.id, dec!(100), "PEN"),
            JournalLine::credit(posted.id, 2, sales.id, dec!(100), "PEN"),
            JournalLine::debit(draft.id, 1, cash.id, dec!(80), "PEN"),
            JournalLine::credit(draft.id, 2, sales.id, dec!(60), "PEN"),
            JournalLine::debit(voided.id, 1, cash.id, dec!(5), "PEN"),
        ];

        LedgerSnapshot {
            accounts: vec![cash, sales],
            entries: vec![posted, draft, voided],
            lines,
        }
    }

    #[test]
    fn test_validate_all_skips_voided_and_counts_rejected() {
        let ledger = InMemoryLedger::from_snapshot(snapshot());
        let report = validate_all(&ledger);

        let numbers: Vec<u32> = report.entries.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(report.rejected, 1);
        assert!(report.entries[0].validation.is_postable);
        assert_eq!(report.entries[1].validation.violations[0].code(), "UNBALANCED_ENTRY");
        assert!(report.chart_issues.is_empty());
    }

    #[test]
    fn test_validation_report_json_shape() {
        let ledger = InMemoryLedger::from_snapshot(snapshot());
        let json = serde_json::to_value(validate_all(&ledger)).unwrap();

        assert_eq!(json["rejected"], 1);
        assert_eq!(json["entries"][0]["is_postable"], true);
        assert_eq!(json["entries"][1]["violations"][0]["kind"]["code"], "UNBALANCED_ENTRY");
    }

    #[test]
    fn test_read_snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!("contab-snapshot-{}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&snapshot()).unwrap()).unwrap();

        let loaded = read_snapshot(&path);
        fs::remove_file(&path).unwrap();
        let ledger = InMemoryLedger::from_snapshot(loaded.unwrap());

        assert_eq!(ledger.chart().len(), 2);
        assert_eq!(ledger.entries().len(), 3);
        assert_eq!(validate_all(&ledger).rejected, 1);
    }

    #[test]
    fn test_read_snapshot_reports_path() {
        let path = std::env::temp_dir().join("contab-missing-snapshot.json");
        let err = read_snapshot(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));

        let bad = std::env::temp_dir().join(format!("contab-bad-snapshot-{}.json", std::process::id()));
        fs::write(&bad, "{ not json").unwrap();
        let err = read_snapshot(&bad).unwrap_err();
        fs::remove_file(&bad).unwrap();
        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
