// 🔎 Filters - Expense / refund / income partitioning
//
// expense: debit
// refund:  credit whose description does not mention "payroll"
// income:  credit whose description mentions "payroll"
//
// Refund and income partition the credit records; debits are never either.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::rules::RuleEngine;
use crate::transaction::{Transaction, TransactionType};

const PAYROLL: &str = "payroll";

// ============================================================================
// PREDICATES
// ============================================================================

pub fn is_expense(tx: &Transaction) -> bool {
    tx.is_debit()
}

pub fn is_refund(tx: &Transaction) -> bool {
    tx.is_credit() && !mentions_payroll(&tx.description)
}

pub fn is_income(tx: &Transaction) -> bool {
    tx.is_credit() && mentions_payroll(&tx.description)
}

fn mentions_payroll(description: &str) -> bool {
    description.to_lowercase().contains(PAYROLL)
}

// ============================================================================
// VIEWS
// ============================================================================

/// A debit record with its category attached for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense<'a> {
    #[serde(flatten)]
    pub transaction: &'a Transaction,

    pub category: &'a str,
}

/// Debits in source order, each classified with `engine`.
pub fn expenses<'a>(records: &'a [Transaction], engine: &'a RuleEngine) -> Vec<Expense<'a>> {
    records
        .iter()
        .filter(|tx| is_expense(tx))
        .map(|tx| Expense {
            transaction: tx,
            category: engine.classify(&tx.description),
        })
        .collect()
}

pub fn refunds(records: &[Transaction]) -> Vec<&Transaction> {
    records.iter().filter(|tx| is_refund(tx)).collect()
}

pub fn income(records: &[Transaction]) -> Vec<&Transaction> {
    records.iter().filter(|tx| is_income(tx)).collect()
}

// ============================================================================
// TYPE FILTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Only(TransactionType),
}

impl TypeFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => tx.transaction_type == *t,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        TransactionType::from_str(s)
            .map(TypeFilter::Only)
            .map_err(|_| Error::InvalidFilter(s.to_string()))
    }
}

/// Records matching `filter`, in source order.
pub fn by_type(records: &[Transaction], filter: TypeFilter) -> Vec<&Transaction> {
    records.iter().filter(|tx| filter.matches(tx)).collect()
}

// ============================================================================
// EXPENSE QUERY
// ============================================================================

/// Optional narrowing of the expense list. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpenseQuery {
    /// `YYYY-MM`
    pub month: Option<String>,

    /// Exact category label
    pub category: Option<String>,

    /// Case-insensitive substring of the description or the category
    pub search: Option<String>,
}

impl ExpenseQuery {
    /// Keep the expenses satisfying every condition present in the query.
    pub fn apply<'a>(&self, expenses: Vec<Expense<'a>>) -> Result<Vec<Expense<'a>>> {
        let month = match non_empty(&self.month) {
            Some(month) => Some(parse_month(month)?),
            None => None,
        };
        let category = non_empty(&self.category);
        let search = non_empty(&self.search).map(str::to_lowercase);

        Ok(expenses
            .into_iter()
            .filter(|e| month.as_ref().map_or(true, |m| &e.transaction.month_key() == m))
            .filter(|e| category.map_or(true, |c| e.category == c))
            .filter(|e| {
                search.as_ref().map_or(true, |s| {
                    e.transaction.description.to_lowercase().contains(s.as_str())
                        || e.category.to_lowercase().contains(s.as_str())
                })
            })
            .collect())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Normalize a `YYYY-MM` string, rejecting anything else.
fn parse_month(month: &str) -> Result<String> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m").to_string())
        .map_err(|_| Error::InvalidMonth(month.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FOOD_AND_GROCERIES, SHOPPING};
    use rust_decimal::Decimal;

    fn tx(date: &str, amount: i64, description: &str, t: TransactionType) -> Transaction {
        Transaction::new(date, Decimal::from(amount), description, t).unwrap()
    }

    fn records() -> Vec<Transaction> {
        vec![
            tx("2024-01-05", -12, "STARBUCKS #44", TransactionType::Debit),
            tx("2024-01-15", 3200, "PAYROLL DEPOSIT", TransactionType::Credit),
            tx("2024-01-22", 42, "AMZN REFUND", TransactionType::Credit),
            tx("2024-02-10", -89, "ZARA ONLINE", TransactionType::Debit),
            tx("2024-02-15", 3200, "acme Payroll", TransactionType::Credit),
            tx("2024-02-20", -5, "payroll fee", TransactionType::Debit),
        ]
    }

    #[test]
    fn test_credit_partition() {
        for record in &records() {
            if record.is_credit() {
                assert!(is_refund(record) != is_income(record), "{record:?}");
            } else {
                assert!(!is_refund(record) && !is_income(record));
                assert!(is_expense(record));
            }
        }
    }

    #[test]
    fn test_views_keep_source_order() {
        let records = records();
        let engine = RuleEngine::builtin();

        let expenses = expenses(&records, &engine);
        let descriptions: Vec<&str> = expenses
            .iter()
            .map(|e| e.transaction.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["STARBUCKS #44", "ZARA ONLINE", "payroll fee"]);
        assert_eq!(expenses[0].category, FOOD_AND_GROCERIES);
        assert_eq!(expenses[1].category, SHOPPING);

        let income = income(&records);
        assert_eq!(income.len(), 2);
        assert_eq!(income[1].description, "acme Payroll");

        let refunds = refunds(&records);
        assert_eq!(refunds.len(), 1);
        assert_eq!(refunds[0].description, "AMZN REFUND");
    }

    #[test]
    fn test_expense_serializes_with_category() {
        let records = records();
        let engine = RuleEngine::builtin();
        let value = serde_json::to_value(&expenses(&records, &engine)[0]).unwrap();

        assert_eq!(value["description"], "STARBUCKS #44");
        assert_eq!(value["type"], "debit");
        assert_eq!(value["category"], FOOD_AND_GROCERIES);
    }

    #[test]
    fn test_type_filter() {
        let records = records();

        assert_eq!(by_type(&records, "all".parse().unwrap()).len(), 6);
        assert_eq!(by_type(&records, "DEBIT".parse().unwrap()).len(), 3);
        assert_eq!(by_type(&records, "credit".parse().unwrap()).len(), 3);
        assert!(matches!(
            "refund".parse::<TypeFilter>(),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_expense_query() {
        let records = records();
        let engine = RuleEngine::builtin();

        let query = ExpenseQuery {
            month: Some("2024-02".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(expenses(&records, &engine)).unwrap().len(), 2);

        let query = ExpenseQuery {
            category: Some(SHOPPING.to_string()),
            ..Default::default()
        };
        let found = query.apply(expenses(&records, &engine)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].transaction.description, "ZARA ONLINE");

        // Search hits the category label as well as the description
        let query = ExpenseQuery {
            search: Some("food".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(expenses(&records, &engine)).unwrap().len(), 1);

        let query = ExpenseQuery {
            month: Some(String::new()),
            category: Some("  ".to_string()),
            search: None,
        };
        assert_eq!(query.apply(expenses(&records, &engine)).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_month() {
        let query = ExpenseQuery {
            month: Some("Feb 2024".to_string()),
            ..Default::default()
        };
        let err = query.apply(Vec::new()).unwrap_err();
        assert!(err.is_client_error());
    }
}
