// 💳 Transaction - One row of the dataset
// Core fields are immutable once loaded; the calendar date is derived from date_str.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The single date format accepted in the date-string column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money going out
    Debit,

    /// Money coming in (refunds and payroll)
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: "DEBIT" and " Debit " are both debits.
impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(TransactionType::Debit),
            "credit" => Ok(TransactionType::Credit),
            other => Err(other.to_string()),
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// A loaded transaction record.
///
/// Serializes to the JSON shape served by the API:
/// `date_str`, `date` (ISO date), `amount` (number), `description`, `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date exactly as it appeared in the source file
    pub date_str: String,

    /// Calendar date parsed from `date_str`
    pub date: NaiveDate,

    /// Signed amount (debits are usually negative)
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub description: String,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Build a record from its date string, failing if the date does not parse.
    pub fn new(
        date_str: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
        transaction_type: TransactionType,
    ) -> Result<Self, chrono::ParseError> {
        let date_str = date_str.into();
        let date = parse_date(&date_str)?;

        Ok(Transaction {
            date_str,
            date,
            amount,
            description: description.into(),
            transaction_type,
        })
    }

    /// Re-derive the calendar date from `date_str`.
    pub fn derive_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        parse_date(&self.date_str)
    }

    /// `YYYY-MM` key of the record's date
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_debit(&self) -> bool {
        self.transaction_type == TransactionType::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.transaction_type == TransactionType::Credit
    }
}

/// Parse a date string with the fixed [`DATE_FORMAT`].
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
}
