//! Electronic ledger book export.
//!
//! One row per journal line, every field terminated by `|`, rows separated
//! by CRLF:
//!
//! ```text
//! period|cuo|correlative|account|unit|cost center|currency|doc type|doc number|
//! reference|posting date|reference date|description|debit|credit|status|
//! ```

use chrono::{Months, NaiveDate};
use contab_shared::config::PleConfig;
use contab_shared::types::round_money;
use serde::Serialize;
use tracing::info;

use super::book::PleBook;
use super::error::PleError;
use crate::reports::{LedgerSource, PostedLine};

const ROW_SEPARATOR: &str = "\r\n";
const OPERATION_INDICATOR: u8 = 1;
const GENERATED_BY_PLE: u8 = 1;
const ACTIVE_ROW: &str = "1";

/// A rendered book file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PleExport {
    /// File name in the tax authority's naming scheme.
    pub file_name: String,
    /// File contents.
    pub content: String,
    /// Number of rows written.
    pub row_count: usize,
}

/// Renders electronic ledger books for one taxpayer.
#[derive(Debug, Clone)]
pub struct PleExporter {
    taxpayer_id: String,
    currency_indicator: u8,
}

impl PleExporter {
    /// Creates an exporter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTaxpayerId` unless `taxpayer_id` is exactly 11 digits.
    pub fn new(taxpayer_id: impl Into<String>, currency_indicator: u8) -> Result<Self, PleError> {
        let taxpayer_id = taxpayer_id.into();
        if taxpayer_id.len() != 11 || !taxpayer_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PleError::InvalidTaxpayerId(taxpayer_id));
        }
        Ok(Self {
            taxpayer_id,
            currency_indicator,
        })
    }

    /// Creates an exporter from configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingTaxpayerId` or `InvalidTaxpayerId`.
    pub fn from_config(config: &PleConfig) -> Result<Self, PleError> {
        let taxpayer_id = config
            .taxpayer_id
            .clone()
            .ok_or(PleError::MissingTaxpayerId)?;
        Self::new(taxpayer_id, config.currency_indicator)
    }

    /// Exports a book for a calendar month from the ledger source.
    ///
    /// # Errors
    ///
    /// - `InvalidMonth` if `year`/`month` is not a valid month
    /// - `Source` if the source cannot supply lines
    pub fn export<S>(&self, source: &S, book: PleBook, year: i32, month: u32) -> Result<PleExport, PleError>
    where
        S: LedgerSource + ?Sized,
    {
        let (start, end) = month_bounds(year, month)?;
        let lines = source.lines_between(start, end)?;
        self.export_lines(&lines, book, year, month)
    }

    /// Exports a book for a calendar month from joined lines.
    ///
    /// Lines outside the month or of Draft/Voided entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` if `year`/`month` is not a valid month.
    pub fn export_lines(
        &self,
        lines: &[PostedLine],
        book: PleBook,
        year: i32,
        month: u32,
    ) -> Result<PleExport, PleError> {
        let (start, end) = month_bounds(year, month)?;

        let mut selected: Vec<&PostedLine> = lines
            .iter()
            .filter(|l| l.is_reportable() && start <= l.posting_date && l.posting_date <= end)
            .collect();

        match book {
            PleBook::Journal => selected.sort_by(|a, b| {
                (a.posting_date, a.entry_number, a.line.sequence)
                    .cmp(&(b.posting_date, b.entry_number, b.line.sequence))
            }),
            PleBook::GeneralLedger => selected.sort_by(|a, b| {
                (&a.account.code, a.posting_date, a.entry_number, a.line.sequence)
                    .cmp(&(&b.account.code, b.posting_date, b.entry_number, b.line.sequence))
            }),
        }

        let period = format!("{year:04}{month:02}00");
        let mut content = String::new();
        for posted in &selected {
            content.push_str(&render_row(&period, posted));
            content.push_str(ROW_SEPARATOR);
        }

        let file_name = self.file_name(book, year, month, !selected.is_empty());
        info!(%book, %file_name, rows = selected.len(), "electronic ledger exported");

        Ok(PleExport {
            file_name,
            content,
            row_count: selected.len(),
        })
    }

    /// Builds the file name for a book and period.
    #[must_use]
    pub fn file_name(&self, book: PleBook, year: i32, month: u32, has_content: bool) -> String {
        format!(
            "LE{ruc}{year:04}{month:02}00{code}00{op}{content}{currency}{generated}.txt",
            ruc = self.taxpayer_id,
            code = book.code(),
            op = OPERATION_INDICATOR,
            content = u8::from(has_content),
            currency = self.currency_indicator,
            generated = GENERATED_BY_PLE,
        )
    }
}

/// Returns the first and last day of a calendar month.
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), PleError> {
    let invalid = || PleError::InvalidMonth { year, month };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((start, end))
}

fn render_row(period: &str, posted: &PostedLine) -> String {
    let line = &posted.line;
    let currency = line
        .currency
        .as_deref()
        .map(sanitize)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| sanitize(&posted.entry_currency));
    let description = line.description.as_deref().unwrap_or(&posted.entry_description);

    let fields = [
        period.to_string(),
        posted.entry_number.to_string(),
        format!("M{}", line.sequence),
        sanitize(&posted.account.code),
        String::new(),
        line.cost_center_id.map(|id| id.to_string()).unwrap_or_default(),
        currency,
        String::new(),
        String::new(),
        line.reference_document.as_deref().map(sanitize).unwrap_or_default(),
        format_date(posted.posting_date),
        line.reference_date.map(format_date).unwrap_or_default(),
        sanitize(description),
        round_money(line.debit).to_string(),
        round_money(line.credit).to_string(),
        ACTIVE_ROW.to_string(),
    ];

    let mut row = fields.join("|");
    row.push('|');
    row
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Strips the field separator and line breaks from free text.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '|' | '\r' | '\n'))
        .collect::<String>()
        .trim()
        .to_string()
}
