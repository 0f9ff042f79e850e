// ⚙️ Configuration - Paths, rules table and messenger settings
// Assembled once at startup from flags / environment; immutable afterwards.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::messenger::{EnvSecretProvider, MessengerConfig, SecretProvider};
use crate::rules::RuleEngine;

/// Flags shared by the CLI and the server.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// CSV file with the transactions
    #[arg(long = "data", env = "TXN_DATA_PATH", default_value = "data/sample_data.csv")]
    pub data_path: PathBuf,

    /// JSON file with the category keyword groups (built-in table if omitted)
    #[arg(long = "rules", env = "TXN_RULES_PATH")]
    pub rules_path: Option<PathBuf>,

    /// Text log that sent messages are appended to
    #[arg(long = "messages", env = "TXN_MESSAGES_PATH", default_value = "data/messages.txt")]
    pub messages_path: PathBuf,
}

#[derive(Clone)]
pub struct AppConfig {
    /// Re-read on every request
    pub data_path: PathBuf,

    pub rules: Arc<RuleEngine>,

    pub messenger: MessengerConfig,

    pub secrets: Arc<dyn SecretProvider>,
}

impl AppConfig {
    pub fn new(data_path: impl Into<PathBuf>, rules: RuleEngine, messenger: MessengerConfig) -> Self {
        AppConfig {
            data_path: data_path.into(),
            rules: Arc::new(rules),
            messenger,
            secrets: Arc::new(EnvSecretProvider),
        }
    }

    /// Replace the secret provider (environment variables by default).
    pub fn with_secrets(mut self, secrets: Arc<dyn SecretProvider>) -> Self {
        self.secrets = secrets;
        self
    }

    /// Build from command line / environment, loading the rules file if given.
    pub fn from_args(args: &SourceArgs) -> Result<Self> {
        let rules = match &args.rules_path {
            Some(path) => RuleEngine::from_file(path)?,
            None => RuleEngine::builtin(),
        };

        Ok(AppConfig::new(
            args.data_path.clone(),
            rules,
            MessengerConfig::new(args.messages_path.clone()),
        ))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("data_path", &self.data_path)
            .field("rules", &self.rules.group_count())
            .field("messenger", &self.messenger)
            .finish_non_exhaustive()
    }
}
