// Transaction Insights - Core Library
// Exposes loading, classification and filtering for the CLI, API server, and tests

pub mod config;
pub mod error;
pub mod filters;
pub mod loader;
pub mod messenger;
pub mod rules;
pub mod summary;
pub mod transaction;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{AppConfig, SourceArgs};
pub use error::{Error, Result};
pub use filters::{
    by_type, expenses, income, is_expense, is_income, is_refund, refunds,
    Expense, ExpenseQuery, TypeFilter,
};
pub use loader::{load_csv, load_from_reader};
pub use messenger::{
    send_message, EnvSecretProvider, MessengerConfig, SecretProvider, StaticSecretProvider,
};
pub use rules::{classify, KeywordGroup, RuleEngine};
pub use summary::{summarize, CategoryTotal, MonthTotal, Summary};
pub use transaction::{Transaction, TransactionType, DATE_FORMAT};

#[cfg(feature = "server")]
pub use api::build_router;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
