//! Ledger data consumed by the report builders.
//!
//! The persistence layer supplies journal lines already joined with their
//! entry header and account. [`InMemoryLedger`] is the snapshot-backed
//! implementation used by the CLI and tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use contab_shared::types::{AccountId, JournalEntryId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::ledger::account::{Account, AccountCatalog, ChartOfAccounts};
use crate::ledger::journal::{EntryStatus, JournalEntry, JournalLine};

/// A journal line joined with its entry header and account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedLine {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Entry sequential number.
    pub entry_number: u32,
    /// Entry posting date.
    pub posting_date: NaiveDate,
    /// Entry status.
    pub entry_status: EntryStatus,
    /// Entry currency code.
    pub entry_currency: String,
    /// Entry description.
    pub entry_description: String,
    /// The line itself.
    pub line: JournalLine,
    /// The resolved account.
    pub account: Account,
}

impl PostedLine {
    /// Joins a line with its header and account.
    #[must_use]
    pub fn new(entry: &JournalEntry, line: JournalLine, account: Account) -> Self {
        Self {
            entry_id: entry.id,
            entry_number: entry.number,
            posting_date: entry.posting_date,
            entry_status: entry.status,
            entry_currency: entry.currency.clone(),
            entry_description: entry.description.clone(),
            line,
            account,
        }
    }

    /// Returns true if the line counts towards reports.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        self.entry_status.counts_in_reports()
    }
}

/// Failure to obtain ledger data.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store is disconnected or unavailable.
    #[error("Ledger source unavailable: {0}")]
    Unavailable(String),
}

/// Supplier of joined journal lines.
///
/// Implementations return lines of Balanced and Posted entries only.
pub trait LedgerSource {
    /// Lines whose entry posting date lies in `[start, end]`.
    fn lines_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PostedLine>, SourceError>;

    /// Lines whose entry posting date is on or before `as_of`.
    fn lines_as_of(&self, as_of: NaiveDate) -> Result<Vec<PostedLine>, SourceError>;
}

/// Serializable ledger contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Chart of accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Journal entry headers.
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
    /// Journal lines of all entries.
    #[serde(default)]
    pub lines: Vec<JournalLine>,
}

/// Ledger held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    chart: ChartOfAccounts,
    entries: HashMap<JournalEntryId, JournalEntry>,
    lines: Vec<JournalLine>,
}

impl InMemoryLedger {
    /// Builds a ledger from its parts.
    #[must_use]
    pub fn new(
        accounts: impl IntoIterator<Item = Account>,
        entries: impl IntoIterator<Item = JournalEntry>,
        lines: impl IntoIterator<Item = JournalLine>,
    ) -> Self {
        Self {
            chart: ChartOfAccounts::new(accounts),
            entries: entries.into_iter().map(|e| (e.id, e)).collect(),
            lines: lines.into_iter().collect(),
        }
    }

    /// Builds a ledger from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self::new(snapshot.accounts, snapshot.entries, snapshot.lines)
    }

    /// Returns the chart of accounts.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Returns entries ordered by posting date then number.
    #[must_use]
    pub fn entries(&self) -> Vec<&JournalEntry> {
        let mut entries: Vec<&JournalEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            a.posting_date
                .cmp(&b.posting_date)
                .then(a.number.cmp(&b.number))
        });
        entries
    }

    /// Returns the lines of an entry ordered by sequence.
    #[must_use]
    pub fn lines_of(&self, entry_id: JournalEntryId) -> Vec<JournalLine> {
        let mut lines: Vec<JournalLine> = self
            .lines
            .iter()
            .filter(|l| l.entry_id == entry_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.sequence);
        lines
    }

    /// Replaces an entry header, e.g. after a lifecycle transition.
    pub fn upsert_entry(&mut self, entry: JournalEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Stores an entry together with its lines, replacing any previous lines.
    pub fn record(&mut self, entry: JournalEntry, lines: impl IntoIterator<Item = JournalLine>) {
        self.lines.retain(|l| l.entry_id != entry.id);
        self.lines.extend(lines);
        self.upsert_entry(entry);
    }

    fn joined(&self, in_range: impl Fn(NaiveDate) -> bool) -> Vec<PostedLine> {
        let mut result = Vec::new();

        for line in &self.lines {
            let Some(entry) = self.entries.get(&line.entry_id) else {
                warn!(line_id = %line.id, entry_id = %line.entry_id, "line without entry skipped");
                continue;
            };
            if !entry.status.counts_in_reports() || !in_range(entry.posting_date) {
                continue;
            }
            let Some(account) = self.chart.account(line.account_id) else {
                warn!(line_id = %line.id, account_id = %line.account_id, "line without account skipped");
                continue;
            };
            result.push(PostedLine::new(entry, line.clone(), account.clone()));
        }

        result
    }
}

impl AccountCatalog for InMemoryLedger {
    fn account(&self, id: AccountId) -> Option<&Account> {
        self.chart.account(id)
    }
}

impl LedgerSource for InMemoryLedger {
    fn lines_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PostedLine>, SourceError> {
        Ok(self.joined(|date| start <= date && date <= end))
    }

    fn lines_as_of(&self, as_of: NaiveDate) -> Result<Vec<PostedLine>, SourceError> {
        Ok(self.joined(|date| date <= as_of))
    }
}
