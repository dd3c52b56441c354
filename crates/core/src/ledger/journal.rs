//! Journal entry header and line types.

use chrono::NaiveDate;
use contab_shared::types::{
    AccountId, CostCenterId, CounterpartyId, EntryTypeId, JournalEntryId, JournalLineId, PeriodId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Journal entry lifecycle status.
///
/// Draft → Balanced → Posted, and any non-voided entry → Voided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being captured and may be unbalanced.
    Draft,
    /// Entry passed validation and awaits commit.
    Balanced,
    /// Entry has been committed to the ledger.
    Posted,
    /// Entry was logically deleted.
    Voided,
}

impl EntryStatus {
    /// Returns true if lines may still be changed.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Balanced)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Voided)
    }

    /// Returns true if the entry's lines count towards reports.
    #[must_use]
    pub fn counts_in_reports(&self) -> bool {
        matches!(self, Self::Balanced | Self::Posted)
    }
}

/// Kind of counterparty attached to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyType {
    /// Customer.
    Client,
    /// Vendor.
    Supplier,
    /// Employee.
    Employee,
    /// Any other third party.
    Other,
}

/// Journal entry header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Accounting period the entry belongs to.
    pub period_id: PeriodId,
    /// Entry type (journal book) the entry belongs to.
    pub entry_type_id: EntryTypeId,
    /// Sequential number within (period, entry type).
    pub number: u32,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Entry currency code.
    pub currency: String,
    /// Exchange rate to the functional currency.
    pub exchange_rate: Decimal,
    /// Main description.
    pub description: String,
    /// Total of line debits.
    #[serde(default)]
    pub total_debit: Decimal,
    /// Total of line credits.
    #[serde(default)]
    pub total_credit: Decimal,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Source document reference (invoice, receipt).
    #[serde(default)]
    pub source_document: Option<String>,
}

impl JournalEntry {
    /// Creates a draft entry with zero totals and an exchange rate of one.
    #[must_use]
    pub fn draft(
        period_id: PeriodId,
        entry_type_id: EntryTypeId,
        number: u32,
        posting_date: NaiveDate,
        currency: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: JournalEntryId::new(),
            period_id,
            entry_type_id,
            number,
            posting_date,
            currency: currency.into(),
            exchange_rate: Decimal::ONE,
            description: description.into(),
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            status: EntryStatus::Draft,
            source_document: None,
        }
    }
}

/// A single debit or credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Position within the entry, starting at 1.
    pub sequence: u32,
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Line currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Cost center for analysis.
    #[serde(default)]
    pub cost_center_id: Option<CostCenterId>,
    /// Counterparty kind.
    #[serde(default)]
    pub counterparty_type: Option<CounterpartyType>,
    /// Counterparty identifier.
    #[serde(default)]
    pub counterparty_id: Option<CounterpartyId>,
    /// Reference document number.
    #[serde(default)]
    pub reference_document: Option<String>,
    /// Reference document date.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    /// Line description.
    #[serde(default)]
    pub description: Option<String>,
}

impl JournalLine {
    fn new(entry_id: JournalEntryId, sequence: u32, account_id: AccountId, currency: &str) -> Self {
        Self {
            id: JournalLineId::new(),
            entry_id,
            sequence,
            account_id,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            currency: Some(currency.to_string()),
            cost_center_id: None,
            counterparty_type: None,
            counterparty_id: None,
            reference_document: None,
            reference_date: None,
            description: None,
        }
    }

    /// Creates a debit line.
    #[must_use]
    pub fn debit(
        entry_id: JournalEntryId,
        sequence: u32,
        account_id: AccountId,
        amount: Decimal,
        currency: &str,
    ) -> Self {
        Self {
            debit: amount,
            ..Self::new(entry_id, sequence, account_id, currency)
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(
        entry_id: JournalEntryId,
        sequence: u32,
        account_id: AccountId,
        amount: Decimal,
        currency: &str,
    ) -> Self {
        Self {
            credit: amount,
            ..Self::new(entry_id, sequence, account_id, currency)
        }
    }

    /// Attaches a cost center.
    #[must_use]
    pub const fn with_cost_center(mut self, cost_center_id: CostCenterId) -> Self {
        self.cost_center_id = Some(cost_center_id);
        self
    }

    /// Attaches a counterparty.
    #[must_use]
    pub const fn with_counterparty(mut self, kind: CounterpartyType, id: CounterpartyId) -> Self {
        self.counterparty_type = Some(kind);
        self.counterparty_id = Some(id);
        self
    }

    /// Attaches a reference document.
    #[must_use]
    pub fn with_reference(mut self, document: impl Into<String>, date: NaiveDate) -> Self {
        self.reference_document = Some(document.into());
        self.reference_date = Some(date);
        self
    }

    /// Returns true if a non-blank currency code is present.
    #[must_use]
    pub fn has_currency(&self) -> bool {
        self.currency.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}
