//! Report generation service.
//!
//! The `*_from_lines` functions are pure aggregations over joined lines; the
//! `build_*` functions fetch those lines from a [`LedgerSource`] first.

use std::collections::HashMap;

use chrono::NaiveDate;
use contab_shared::types::{AccountId, round_money, same_money};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::ReportError;
use super::hierarchy;
use super::source::{LedgerSource, PostedLine};
use super::types::{
    BalanceSheet, IncomeStatement, ReportOptions, ReportRow, RollupRow, TrialBalance,
    TrialBalanceRow,
};
use crate::ledger::account::{ChartOfAccounts, Classification};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Builds the income statement for `[start, end]` from the ledger source.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange` if `start` is after `end`
    /// - `SourceUnavailable` if the source cannot supply lines
    /// - `AmountOutOfRange` if a total exceeds the decimal range
    pub fn build_income_statement<S>(
        source: &S,
        start: NaiveDate,
        end: NaiveDate,
        options: &ReportOptions,
    ) -> Result<IncomeStatement, ReportError>
    where
        S: LedgerSource + ?Sized,
    {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        let lines = source.lines_between(start, end)?;
        Self::income_statement_from_lines(&lines, start, end, options)
    }

    /// Builds the balance sheet as of a date from the ledger source.
    ///
    /// # Errors
    ///
    /// - `SourceUnavailable` if the source cannot supply lines
    /// - `AmountOutOfRange` if a total exceeds the decimal range
    pub fn build_balance_sheet<S>(
        source: &S,
        as_of: NaiveDate,
        options: &ReportOptions,
    ) -> Result<BalanceSheet, ReportError>
    where
        S: LedgerSource + ?Sized,
    {
        let lines = source.lines_as_of(as_of)?;
        Self::balance_sheet_from_lines(&lines, as_of, options)
    }

    /// Builds the trial balance as of a date from the ledger source.
    ///
    /// # Errors
    ///
    /// - `SourceUnavailable` if the source cannot supply lines
    /// - `AmountOutOfRange` if a total exceeds the decimal range
    pub fn build_trial_balance<S>(
        source: &S,
        as_of: NaiveDate,
        options: &ReportOptions,
    ) -> Result<TrialBalance, ReportError>
    where
        S: LedgerSource + ?Sized,
    {
        let lines = source.lines_as_of(as_of)?;
        Self::trial_balance_from_lines(&lines, as_of, options)
    }

    /// Aggregates an income statement from joined lines.
    ///
    /// Lines outside `[start, end]` or belonging to Draft/Voided entries are
    /// ignored, as are lines on balance sheet accounts.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange` if `start` is after `end`
    /// - `AmountOutOfRange` if a total exceeds the decimal range
    pub fn income_statement_from_lines(
        lines: &[PostedLine],
        start: NaiveDate,
        end: NaiveDate,
        options: &ReportOptions,
    ) -> Result<IncomeStatement, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }

        let selected: Vec<&PostedLine> = lines
            .iter()
            .filter(|l| l.is_reportable() && start <= l.posting_date && l.posting_date <= end)
            .collect();

        let income_rows = aggregate(&selected, |c| c == Classification::Income)?;
        let expense_rows = aggregate(&selected, |c| {
            matches!(c, Classification::Expense | Classification::Cost)
        })?;

        let total_income = sum_rows(&income_rows, "income")?;
        let total_expense = sum_rows(&expense_rows, "expenses")?;
        let net_income = total_income
            .checked_sub(total_expense)
            .ok_or(ReportError::AmountOutOfRange("net income"))?;

        debug!(
            %start,
            %end,
            lines = selected.len(),
            income_rows = income_rows.len(),
            expense_rows = expense_rows.len(),
            "income statement aggregated"
        );

        Ok(IncomeStatement {
            period_start: start,
            period_end: end,
            currency: options.currency.clone(),
            income_rows,
            total_income,
            expense_rows,
            total_expense,
            net_income,
        })
    }

    /// Aggregates a balance sheet from joined lines.
    ///
    /// The net of income, expense and cost lines is always reported as
    /// `unclosed_result`. It is added to equity only when
    /// `options.fold_period_result` is set.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a total exceeds the decimal range.
    pub fn balance_sheet_from_lines(
        lines: &[PostedLine],
        as_of: NaiveDate,
        options: &ReportOptions,
    ) -> Result<BalanceSheet, ReportError> {
        let selected: Vec<&PostedLine> = lines
            .iter()
            .filter(|l| l.is_reportable() && l.posting_date <= as_of)
            .collect();

        let asset_rows = aggregate(&selected, |c| c == Classification::Asset)?;
        let liability_rows = aggregate(&selected, |c| c == Classification::Liability)?;
        let mut equity_rows = aggregate(&selected, |c| c == Classification::Equity)?;

        let unclosed_result = selected
            .iter()
            .filter(|l| l.account.classification.is_result())
            .try_fold(Decimal::ZERO, |acc, l| {
                l.line
                    .credit
                    .checked_sub(l.line.debit)
                    .and_then(|net| acc.checked_add(net))
            })
            .map(round_money)
            .ok_or(ReportError::AmountOutOfRange("period result"))?;

        let period_result_folded = options.fold_period_result && !unclosed_result.is_zero();
        if period_result_folded {
            fold_into_equity(&mut equity_rows, unclosed_result, options)?;
        }

        let total_assets = sum_rows(&asset_rows, "assets")?;
        let total_liabilities = sum_rows(&liability_rows, "liabilities")?;
        let total_equity = sum_rows(&equity_rows, "equity")?;
        let verification = total_liabilities
            .checked_add(total_equity)
            .ok_or(ReportError::AmountOutOfRange("liabilities and equity"))?;
        let is_balanced = same_money(total_assets, verification);

        if !is_balanced {
            warn!(
                %as_of,
                %total_assets,
                %verification,
                %unclosed_result,
                "balance sheet does not balance"
            );
        }

        Ok(BalanceSheet {
            as_of,
            currency: options.currency.clone(),
            asset_rows,
            total_assets,
            liability_rows,
            total_liabilities,
            equity_rows,
            total_equity,
            verification,
            unclosed_result,
            period_result_folded,
            is_balanced,
        })
    }

    /// Sums debits and credits per account from joined lines.
    ///
    /// Accounts with no movement on either side are omitted.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a sum exceeds the decimal range.
    pub fn trial_balance_from_lines(
        lines: &[PostedLine],
        as_of: NaiveDate,
        options: &ReportOptions,
    ) -> Result<TrialBalance, ReportError> {
        let mut sums: HashMap<AccountId, TrialBalanceRow> = HashMap::new();

        for posted in lines
            .iter()
            .filter(|l| l.is_reportable() && l.posting_date <= as_of)
        {
            let row = sums
                .entry(posted.account.id)
                .or_insert_with(|| TrialBalanceRow {
                    account_id: posted.account.id,
                    code: posted.account.code.clone(),
                    name: posted.account.name.clone(),
                    total_debit: Decimal::ZERO,
                    total_credit: Decimal::ZERO,
                });
            row.total_debit = add(row.total_debit, posted.line.debit, "debits")?;
            row.total_credit = add(row.total_credit, posted.line.credit, "credits")?;
        }

        let mut rows: Vec<TrialBalanceRow> = sums
            .into_values()
            .map(|mut row| {
                row.total_debit = round_money(row.total_debit);
                row.total_credit = round_money(row.total_credit);
                row
            })
            .filter(|row| !(row.total_debit.is_zero() && row.total_credit.is_zero()))
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit = rows
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| add(acc, r.total_debit, "debits"))?;
        let total_credit = rows
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| add(acc, r.total_credit, "credits"))?;

        Ok(TrialBalance {
            as_of,
            currency: options.currency.clone(),
            rows,
            total_debit,
            total_credit,
            is_balanced: same_money(total_debit, total_credit),
        })
    }

    /// Rolls report rows up the chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a subtotal exceeds the decimal range.
    pub fn roll_up(
        rows: &[ReportRow],
        chart: &ChartOfAccounts,
    ) -> Result<Vec<RollupRow>, ReportError> {
        hierarchy::roll_up(rows, chart)
    }
}

/// Aggregates lines of the matching classifications into per-account rows.
///
/// Each total is oriented to the account's nature and rounded to the monetary
/// scale. Zero rows are dropped and the rest sorted by code.
fn aggregate(
    lines: &[&PostedLine],
    include: impl Fn(Classification) -> bool,
) -> Result<Vec<ReportRow>, ReportError> {
    let mut by_account: HashMap<AccountId, ReportRow> = HashMap::new();

    for posted in lines.iter().filter(|l| include(l.account.classification)) {
        let account = &posted.account;
        let row = by_account.entry(account.id).or_insert_with(|| ReportRow {
            account_id: Some(account.id),
            code: account.code.clone(),
            name: account.name.clone(),
            total: Decimal::ZERO,
        });
        let movement = account
            .nature
            .orient(posted.line.debit, posted.line.credit)
            .ok_or(ReportError::AmountOutOfRange("account balances"))?;
        row.total = add(row.total, movement, "account balances")?;
    }

    let mut rows: Vec<ReportRow> = by_account
        .into_values()
        .map(|mut row| {
            row.total = round_money(row.total);
            row
        })
        .filter(|row| !row.total.is_zero())
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(rows)
}

fn add(total: Decimal, amount: Decimal, what: &'static str) -> Result<Decimal, ReportError> {
    total
        .checked_add(amount)
        .ok_or(ReportError::AmountOutOfRange(what))
}

fn sum_rows(rows: &[ReportRow], what: &'static str) -> Result<Decimal, ReportError> {
    rows.iter().try_fold(Decimal::ZERO, |acc, r| add(acc, r.total, what))
}

/// Adds the period result to the retained earnings row, creating it if needed.
fn fold_into_equity(
    rows: &mut Vec<ReportRow>,
    result: Decimal,
    options: &ReportOptions,
) -> Result<(), ReportError> {
    if let Some(row) = rows
        .iter_mut()
        .find(|r| r.code == options.retained_earnings_code)
    {
        row.total = add(row.total, result, "equity")?;
    } else {
        rows.push(ReportRow {
            account_id: None,
            code: options.retained_earnings_code.clone(),
            name: options.retained_earnings_name.clone(),
            total: result,
        });
    }

    rows.retain(|r| !r.total.is_zero());
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(())
}
