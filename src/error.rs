// ⚠️ Errors - Library-wide error type
// Load errors are fatal for a request, field errors are the caller's fault.

use std::path::PathBuf;

/// The errors that may occur while loading, classifying or sending.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The data source (or another file) could not be opened or written.
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (bad quoting, inconsistent row length, ...).
    #[error("could not read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),

    /// A row carries a date that does not match `%Y-%m-%d`.
    #[error("line {line}: invalid date \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate { line: u64, value: String },

    /// A row carries an amount that is not a decimal number.
    #[error("line {line}: invalid amount \"{value}\"")]
    InvalidAmount { line: u64, value: String },

    /// A row carries a type other than debit/credit.
    #[error("line {line}: invalid transaction type \"{value}\" (expected debit or credit)")]
    InvalidType { line: u64, value: String },

    /// The category rules table is not usable.
    #[error("invalid category rules: {0}")]
    InvalidRules(String),

    /// The category rules file is not valid JSON for a rules table.
    #[error("could not parse category rules: {0}")]
    RulesJson(#[from] serde_json::Error),

    /// A request omitted a required field.
    #[error("missing required field \"{0}\"")]
    MissingField(&'static str),

    /// The secret provider has no value for the key.
    #[error("secret \"{0}\" is not configured")]
    MissingSecret(String),

    /// Unknown transaction type filter.
    #[error("unknown filter \"{0}\" (expected all, debit or credit)")]
    InvalidFilter(String),

    /// A month filter that is not `YYYY-MM`.
    #[error("invalid month \"{0}\" (expected YYYY-MM)")]
    InvalidMonth(String),
}

impl Error {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingField(_) | Error::InvalidFilter(_) | Error::InvalidMonth(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
