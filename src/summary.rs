// 📊 Summary - Aggregates for the dashboard
// Amounts are summed as absolute values, like the spending charts show them.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::filters::{expenses, income, refunds};
use crate::rules::RuleEngine;
use crate::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    /// `YYYY-MM`
    pub month: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub transaction_count: usize,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_refunds: Decimal,

    /// income + refunds - expenses
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,

    /// Largest total first
    pub by_category: Vec<CategoryTotal>,

    /// Oldest month first
    pub by_month: Vec<MonthTotal>,
}

/// Summarize a set of loaded records.
pub fn summarize(records: &[Transaction], engine: &RuleEngine) -> Summary {
    let expenses = expenses(records, engine);
    let income = income(records);
    let refunds = refunds(records);

    let total_expenses: Decimal = expenses.iter().map(|e| e.transaction.amount.abs()).sum();
    let total_income: Decimal = income.iter().map(|tx| tx.amount.abs()).sum();
    let total_refunds: Decimal = refunds.iter().map(|tx| tx.amount.abs()).sum();

    let mut categories: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for expense in &expenses {
        let entry = categories.entry(expense.category).or_insert((Decimal::ZERO, 0));
        entry.0 += expense.transaction.amount.abs();
        entry.1 += 1;
    }

    let mut by_category: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    // BTreeMap keeps months in order
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for expense in &expenses {
        months
            .entry(expense.transaction.month_key())
            .or_insert((Decimal::ZERO, Decimal::ZERO))
            .0 += expense.transaction.amount.abs();
    }
    for tx in &income {
        months
            .entry(tx.month_key())
            .or_insert((Decimal::ZERO, Decimal::ZERO))
            .1 += tx.amount.abs();
    }

    let by_month = months
        .into_iter()
        .map(|(month, (expenses, income))| MonthTotal {
            month,
            expenses,
            income,
        })
        .collect();

    Summary {
        transaction_count: records.len(),
        total_expenses,
        total_income,
        total_refunds,
        net: total_income + total_refunds - total_expenses,
        by_category,
        by_month,
    }
}
