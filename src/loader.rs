// 📂 Loader - CSV → ordered transaction records
//
// Source layout: [unnamed index (date string), amount, description, type]
// The unnamed index column is renamed to date_str and parsed with a fixed format.
//
// Malformed rows fail the whole load (first bad row wins). Nothing is
// filtered or sorted here; source order is preserved.

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::transaction::{parse_date, Transaction, TransactionType};

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    date_str: usize,
    amount: usize,
    description: usize,
    transaction_type: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let find = |name: &'static str| {
            names
                .iter()
                .position(|h| h == name)
                .ok_or(Error::MissingColumn(name))
        };

        // pandas writes the index column with an empty header, and reads it
        // back as "Unnamed: 0"
        let date_str = names
            .iter()
            .position(|h| h.is_empty() || h.starts_with("unnamed") || h == "date_str")
            .ok_or(Error::MissingColumn("date_str"))?;

        Ok(Columns {
            date_str,
            amount: find("amount")?,
            description: find("description")?,
            transaction_type: find("type")?,
        })
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load all transactions from a CSV file.
pub fn load_csv(csv_path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(csv_path).map_err(|e| Error::io(csv_path, e))?;

    let transactions = load_from_reader(file)?;
    tracing::debug!(
        "Loaded {} transactions from {}",
        transactions.len(),
        csv_path.display()
    );

    Ok(transactions)
}

/// Load all transactions from any CSV byte source.
pub fn load_from_reader<R: Read>(source: R) -> Result<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut transactions = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let tx = parse_row(&record, columns, line).inspect_err(|e| {
            tracing::warn!("Rejecting CSV data: {}", e);
        })?;
        transactions.push(tx);
    }

    Ok(transactions)
}

fn parse_row(record: &StringRecord, columns: Columns, line: u64) -> Result<Transaction> {
    let field = |index: usize| record.get(index).unwrap_or("");

    let date_str = field(columns.date_str);
    let date = parse_date(date_str).map_err(|_| Error::InvalidDate {
        line,
        value: date_str.to_string(),
    })?;

    let amount_raw = field(columns.amount);
    let amount = parse_amount(amount_raw).ok_or_else(|| Error::InvalidAmount {
        line,
        value: amount_raw.to_string(),
    })?;

    let type_raw = field(columns.transaction_type);
    let transaction_type =
        TransactionType::from_str(type_raw).map_err(|_| Error::InvalidType {
            line,
            value: type_raw.to_string(),
        })?;

    Ok(Transaction {
        date_str: date_str.to_string(),
        date,
        amount,
        description: field(columns.description).to_string(),
        transaction_type,
    })
}

/// Plain ("-12.50") or scientific ("1.5e2") decimal notation.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    const SAMPLE: &str = "\
,amount,description,type
2024-01-05,-12.50,STARBUCKS #44,debit
2024-01-06,2500.00,PAYROLL DEPOSIT,credit
2024-01-07,19.99,AMAZON REFUND,credit
2024-01-03,-9.99,SPOTIFY P1234,debit
";

    #[test]
    fn test_load_preserves_source_order() {
        let txs = load_from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(txs.len(), 4);
        let descriptions: Vec<&str> = txs.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["STARBUCKS #44", "PAYROLL DEPOSIT", "AMAZON REFUND", "SPOTIFY P1234"]
        );
    }

    #[test]
    fn test_load_parses_fields() {
        let txs = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let first = &txs[0];

        assert_eq!(first.date_str, "2024-01-05");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(first.amount, Decimal::from_str("-12.50").unwrap());
        assert_eq!(first.transaction_type, TransactionType::Debit);
        assert_eq!(txs[1].transaction_type, TransactionType::Credit);
    }

    #[test]
    fn test_unnamed_header_and_column_order() {
        let csv = "\
type,description,Unnamed: 0,amount
credit,PAYROLL,2024-03-01,100
";
        let txs = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(txs[0].date_str, "2024-03-01");
        assert_eq!(txs[0].description, "PAYROLL");
        assert_eq!(txs[0].amount, Decimal::from(100));
    }

    #[test]
    fn test_malformed_date_fails_whole_load() {
        let csv = "\
,amount,description,type
2024-01-05,-12.50,STARBUCKS,debit
05/01/2024,-3.00,DELI,debit
";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            Error::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "05/01/2024");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_amount_and_type() {
        let csv = ",amount,description,type\n2024-01-05,abc,X,debit\n";
        assert!(matches!(
            load_from_reader(csv.as_bytes()),
            Err(Error::InvalidAmount { line: 2, .. })
        ));

        let csv = ",amount,description,type\n2024-01-05,1.00,X,transfer\n";
        assert!(matches!(
            load_from_reader(csv.as_bytes()),
            Err(Error::InvalidType { line: 2, .. })
        ));
    }

    #[test]
    fn test_date_str_header_accepted() {
        let csv = "\
date_str,amount,description,type
2024-04-02,-3.20,CORNER DELI,debit
";
        let txs = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "\
,amount,description,type

2024-01-05,-12.50,STARBUCKS #44,debit

2024-01-06,2500.00,PAYROLL DEPOSIT,credit
";
        let txs = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].description, "PAYROLL DEPOSIT");
    }

    #[test]
    fn test_missing_column() {
        let csv = ",amount,type\n2024-01-05,1.00,debit\n";
        assert!(matches!(
            load_from_reader(csv.as_bytes()),
            Err(Error::MissingColumn("description"))
        ));
    }

    #[test]
    fn test_scientific_amount() {
        assert_eq!(parse_amount("1.5e2"), Some(Decimal::from(150)));
        assert_eq!(parse_amount(" -4 "), Some(Decimal::from(-4)));
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_load_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let txs = load_csv(file.path()).unwrap();
        assert_eq!(txs.len(), 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/sample_data.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_date_round_trip_is_stable() {
        let first = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let second = load_from_reader(SAMPLE.as_bytes()).unwrap();

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.derive_date().unwrap(), a.date);
            assert_eq!(a.date, b.date);
        }
    }
}
