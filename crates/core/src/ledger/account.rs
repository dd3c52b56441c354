//! Chart of accounts domain types.

use std::collections::{BTreeMap, HashMap, HashSet};

use contab_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// General classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Resources owned (cash, receivables, fixed assets).
    Asset,
    /// Obligations owed to third parties.
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Revenue and other income.
    Income,
    /// Operating and other expenses.
    Expense,
    /// Cost of sales and production costs.
    Cost,
}

impl Classification {
    /// Returns the side that normally increases accounts of this classification.
    #[must_use]
    pub const fn default_nature(self) -> BalanceNature {
        match self {
            Self::Asset | Self::Expense | Self::Cost => BalanceNature::Debit,
            Self::Liability | Self::Equity | Self::Income => BalanceNature::Credit,
        }
    }

    /// Returns true for classifications that feed the income statement.
    #[must_use]
    pub const fn is_result(self) -> bool {
        matches!(self, Self::Income | Self::Expense | Self::Cost)
    }
}

/// Side of the ledger that increases an account's balance.
///
/// - Debit nature: balance += debit - credit
/// - Credit nature: balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceNature {
    /// Debit increases the balance.
    Debit,
    /// Credit increases the balance.
    Credit,
}

impl BalanceNature {
    /// Expresses a debit/credit movement as an increase along this side.
    ///
    /// Returns `None` if the difference falls outside the decimal range.
    #[must_use]
    pub fn orient(self, debit: Decimal, credit: Decimal) -> Option<Decimal> {
        match self {
            Self::Debit => debit.checked_sub(credit),
            Self::Credit => credit.checked_sub(debit),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account accepts postings.
    #[default]
    Active,
    /// Account is kept for history only.
    Inactive,
}

/// A node in the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Hierarchical code (e.g. "10", "10.1").
    pub code: String,
    /// Display name.
    pub name: String,
    /// General classification.
    pub classification: Classification,
    /// Side that increases the balance.
    pub nature: BalanceNature,
    /// Parent account, if any.
    #[serde(default)]
    pub parent_id: Option<AccountId>,
    /// Lines must carry a cost center.
    #[serde(default)]
    pub requires_cost_center: bool,
    /// Lines must carry a counterparty type and id.
    #[serde(default)]
    pub requires_counterparty: bool,
    /// Lines may post directly to this account.
    #[serde(default = "default_allow_direct_posting")]
    pub allow_direct_posting: bool,
    /// Current status.
    #[serde(default)]
    pub status: AccountStatus,
}

fn default_allow_direct_posting() -> bool {
    true
}

impl Account {
    /// Creates an active posting account with the classification's usual nature.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, classification: Classification) -> Self {
        Self {
            id: AccountId::new(),
            code: code.into(),
            name: name.into(),
            classification,
            nature: classification.default_nature(),
            parent_id: None,
            requires_cost_center: false,
            requires_counterparty: false,
            allow_direct_posting: true,
            status: AccountStatus::Active,
        }
    }

    /// Overrides the balance nature.
    #[must_use]
    pub const fn with_nature(mut self, nature: BalanceNature) -> Self {
        self.nature = nature;
        self
    }

    /// Sets the parent account.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Requires counterparty analysis on every line.
    #[must_use]
    pub const fn requiring_counterparty(mut self) -> Self {
        self.requires_counterparty = true;
        self
    }

    /// Requires a cost center on every line.
    #[must_use]
    pub const fn requiring_cost_center(mut self) -> Self {
        self.requires_cost_center = true;
        self
    }

    /// Marks the account as a grouping account that rejects direct postings.
    #[must_use]
    pub const fn summary_only(mut self) -> Self {
        self.allow_direct_posting = false;
        self
    }

    /// Marks the account inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.status = AccountStatus::Inactive;
        self
    }

    /// Returns true if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Lookup of accounts by id.
///
/// Implemented by whatever holds the chart of accounts for a request.
pub trait AccountCatalog {
    /// Returns the account with the given id, if it exists.
    fn account(&self, id: AccountId) -> Option<&Account>;
}

impl AccountCatalog for HashMap<AccountId, Account> {
    fn account(&self, id: AccountId) -> Option<&Account> {
        self.get(&id)
    }
}

/// Inconsistency found in the account tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyIssue {
    /// The parent reference does not resolve.
    MissingParent {
        /// Child account code.
        code: String,
        /// Unresolved parent id.
        parent_id: AccountId,
    },
    /// Parent and child classifications differ.
    ClassificationMismatch {
        /// Child account code.
        code: String,
        /// Parent account code.
        parent_code: String,
    },
    /// Parent and child balance natures differ.
    NatureMismatch {
        /// Child account code.
        code: String,
        /// Parent account code.
        parent_code: String,
    },
    /// Following parent references leads back to the account.
    Cycle {
        /// Account code where the cycle was detected.
        code: String,
    },
}

/// In-memory chart of accounts.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountId, Account>,
    by_code: BTreeMap<String, AccountId>,
}

impl ChartOfAccounts {
    /// Builds a chart from a list of accounts.
    ///
    /// Later accounts replace earlier ones with the same id.
    #[must_use]
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut chart = Self::default();
        for account in accounts {
            chart.insert(account);
        }
        chart
    }

    /// Adds or replaces an account.
    pub fn insert(&mut self, account: Account) {
        if let Some(previous) = self.accounts.get(&account.id) {
            self.by_code.remove(&previous.code);
        }
        self.by_code.insert(account.code.clone(), account.id);
        self.accounts.insert(account.id, account);
    }

    /// Returns the account with the given code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(code).and_then(|id| self.accounts.get(id))
    }

    /// Iterates accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.by_code.values().filter_map(|id| self.accounts.get(id))
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Returns the ancestors of an account, nearest first.
    ///
    /// Stops at a missing parent or when a cycle is detected.
    #[must_use]
    pub fn ancestors(&self, id: AccountId) -> Vec<&Account> {
        let mut result = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.accounts.get(&id).and_then(|a| a.parent_id);

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.accounts.get(&parent_id) else {
                break;
            };
            result.push(parent);
            current = parent.parent_id;
        }

        result
    }

    /// Reports parent/child inconsistencies.
    ///
    /// Purely diagnostic: journal validation does not consult it.
    #[must_use]
    pub fn hierarchy_issues(&self) -> Vec<HierarchyIssue> {
        let mut issues = Vec::new();

        for account in self.iter() {
            let Some(parent_id) = account.parent_id else {
                continue;
            };
            let Some(parent) = self.accounts.get(&parent_id) else {
                issues.push(HierarchyIssue::MissingParent {
                    code: account.code.clone(),
                    parent_id,
                });
                continue;
            };

            if parent.classification != account.classification {
                issues.push(HierarchyIssue::ClassificationMismatch {
                    code: account.code.clone(),
                    parent_code: parent.code.clone(),
                });
            }
            if parent.nature != account.nature {
                issues.push(HierarchyIssue::NatureMismatch {
                    code: account.code.clone(),
                    parent_code: parent.code.clone(),
                });
            }
            if self.in_cycle(account.id) {
                issues.push(HierarchyIssue::Cycle {
                    code: account.code.clone(),
                });
            }
        }

        issues
    }

    fn in_cycle(&self, id: AccountId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(next) = current {
            if !seen.insert(next) {
                return next == id;
            }
            current = self.accounts.get(&next).and_then(|a| a.parent_id);
        }
        false
    }
}

impl AccountCatalog for ChartOfAccounts {
    fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }
}
