//! Hierarchical aggregation over the chart of accounts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{ReportRow, RollupRow};
use crate::ledger::account::ChartOfAccounts;

/// Rolls report rows up to every ancestor account.
///
/// Each row contributes its total to its own node and to each ancestor found
/// in the chart. Rows whose account is not in the chart (such as a synthetic
/// retained earnings row) stay as depth-0 leaves. The result is sorted by
/// code and skips nodes whose subtotal is zero.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if a subtotal exceeds the decimal range.
pub fn roll_up(rows: &[ReportRow], chart: &ChartOfAccounts) -> Result<Vec<RollupRow>, ReportError> {
    let mut nodes: BTreeMap<String, RollupRow> = BTreeMap::new();

    for row in rows {
        let own = nodes.entry(row.code.clone()).or_insert_with(|| RollupRow {
            account_id: row.account_id,
            code: row.code.clone(),
            name: row.name.clone(),
            depth: 0,
            is_leaf: true,
            total: Decimal::ZERO,
        });
        own.is_leaf = true;
        own.total = add(own.total, row.total)?;

        let Some(account_id) = row.account_id else {
            continue;
        };
        let ancestors = chart.ancestors(account_id);
        if let Some(own) = nodes.get_mut(&row.code) {
            own.depth = ancestors.len();
        }

        let depth_of_root = ancestors.len();
        for (distance, parent) in ancestors.into_iter().enumerate() {
            let node = nodes.entry(parent.code.clone()).or_insert_with(|| RollupRow {
                account_id: Some(parent.id),
                code: parent.code.clone(),
                name: parent.name.clone(),
                depth: depth_of_root - distance - 1,
                is_leaf: false,
                total: Decimal::ZERO,
            });
            node.total = add(node.total, row.total)?;
        }
    }

    Ok(nodes.into_values().filter(|n| !n.total.is_zero()).collect())
}

fn add(subtotal: Decimal, amount: Decimal) -> Result<Decimal, ReportError> {
    subtotal
        .checked_add(amount)
        .ok_or(ReportError::AmountOutOfRange("subtotals"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::account::{Account, Classification};
    use rust_decimal_macros::dec;

    fn row(account: &Account, total: Decimal) -> ReportRow {
        ReportRow {
            account_id: Some(account.id),
            code: account.code.clone(),
            name: account.name.clone(),
            total,
        }
    }

    #[test]
    fn test_roll_up_subtotals_ancestors() {
        let cash_group = Account::new("10", "Cash and equivalents", Classification::Asset).summary_only();
        let petty = Account::new("10.1", "Petty cash", Classification::Asset).with_parent(cash_group.id);
        let bank = Account::new("10.4", "Bank", Classification::Asset).with_parent(cash_group.id);
        let receivables = Account::new("12", "Receivables", Classification::Asset);
        let rows = vec![row(&petty, dec!(100.00)), row(&bank, dec!(900.00)), row(&receivables, dec!(50.00))];
        let chart = ChartOfAccounts::new([cash_group, petty, bank, receivables]);

        let rolled = roll_up(&rows, &chart).unwrap();
        let view: Vec<(&str, usize, bool, Decimal)> = rolled
            .iter()
            .map(|r| (r.code.as_str(), r.depth, r.is_leaf, r.total))
            .collect();

        assert_eq!(
            view,
            vec![
                ("10", 0, false, dec!(1000.00)),
                ("10.1", 1, true, dec!(100.00)),
                ("10.4", 1, true, dec!(900.00)),
                ("12", 0, true, dec!(50.00)),
            ]
        );
    }

    #[test]
    fn test_roll_up_keeps_synthetic_rows() {
        let rows = vec![ReportRow {
            account_id: None,
            code: "59".to_string(),
            name: "Resultado del ejercicio".to_string(),
            total: dec!(700.00),
        }];

        let rolled = roll_up(&rows, &ChartOfAccounts::default()).unwrap();
        assert_eq!(rolled.len(), 1);
        assert!(rolled[0].is_leaf);
        assert_eq!(rolled[0].depth, 0);
    }

    #[test]
    fn test_roll_up_drops_offsetting_parents() {
        let parent = Account::new("40", "Taxes payable", Classification::Liability);
        let a = Account::new("40.1", "VAT", Classification::Liability).with_parent(parent.id);
        let b = Account::new("40.2", "VAT credit", Classification::Liability).with_parent(parent.id);
        let rows = vec![row(&a, dec!(30)), row(&b, dec!(-30))];
        let chart = ChartOfAccounts::new([parent, a, b]);

        let codes: Vec<String> = roll_up(&rows, &chart).unwrap().into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["40.1".to_string(), "40.2".to_string()]);
    }

    #[test]
    fn test_roll_up_subtotal_overflow() {
        let parent = Account::new("10", "Cash", Classification::Asset).summary_only();
        let a = Account::new("10.1", "Till", Classification::Asset).with_parent(parent.id);
        let b = Account::new("10.2", "Bank", Classification::Asset).with_parent(parent.id);
        let rows = vec![row(&a, Decimal::MAX), row(&b, Decimal::MAX)];
        let chart = ChartOfAccounts::new([parent, a, b]);

        let err = roll_up(&rows, &chart).unwrap_err();
        assert_eq!(err.error_code(), "AMOUNT_OUT_OF_RANGE");
    }
}
