//! Report data types.

use chrono::NaiveDate;
use contab_shared::AppConfig;
use contab_shared::types::{AccountId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One account's aggregate in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Account ID (`None` for synthetic rows such as the folded period result).
    pub account_id: Option<AccountId>,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Aggregate along the account's natural side.
    pub total: Decimal,
}

/// Income statement for a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Period start date (inclusive).
    pub period_start: NaiveDate,
    /// Period end date (inclusive).
    pub period_end: NaiveDate,
    /// Currency code.
    pub currency: String,
    /// Income accounts.
    pub income_rows: Vec<ReportRow>,
    /// Sum of income rows.
    pub total_income: Decimal,
    /// Expense and cost accounts.
    pub expense_rows: Vec<ReportRow>,
    /// Sum of expense rows.
    pub total_expense: Decimal,
    /// Total income minus total expense (negative for a loss).
    pub net_income: Decimal,
}

/// Balance sheet as of a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// As of date (inclusive).
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: String,
    /// Asset accounts.
    pub asset_rows: Vec<ReportRow>,
    /// Sum of asset rows.
    pub total_assets: Decimal,
    /// Liability accounts.
    pub liability_rows: Vec<ReportRow>,
    /// Sum of liability rows.
    pub total_liabilities: Decimal,
    /// Equity accounts.
    pub equity_rows: Vec<ReportRow>,
    /// Sum of equity rows.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub verification: Decimal,
    /// Net of income, expense and cost lines up to the as-of date.
    pub unclosed_result: Decimal,
    /// Whether `unclosed_result` was folded into equity.
    pub period_result_folded: bool,
    /// Whether assets equal liabilities plus equity at the monetary scale.
    pub is_balanced: bool,
}

impl BalanceSheet {
    /// Returns assets minus liabilities plus equity, saturating at the
    /// decimal bounds.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        round_money(self.total_assets.saturating_sub(self.verification))
    }
}

/// Trial balance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: String,
    /// Per-account sums.
    pub rows: Vec<TrialBalanceRow>,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Subtotal for a node of the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupRow {
    /// Account ID (`None` for synthetic rows).
    pub account_id: Option<AccountId>,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Number of ancestors above this node.
    pub depth: usize,
    /// Whether the node carries its own report row.
    pub is_leaf: bool,
    /// Own total plus the totals of all descendants.
    pub total: Decimal,
}

/// Options shared by the statement builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Currency code printed on the reports.
    pub currency: String,
    /// Fold the unclosed income/expense result into equity.
    pub fold_period_result: bool,
    /// Code of the synthetic retained earnings row.
    pub retained_earnings_code: String,
    /// Name of the synthetic retained earnings row.
    pub retained_earnings_name: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ReportOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            currency: config.ledger.base_currency.clone(),
            fold_period_result: config.reports.fold_period_result,
            retained_earnings_code: config.reports.retained_earnings_code.clone(),
            retained_earnings_name: config.reports.retained_earnings_name.clone(),
        }
    }
}
