// ✉️ Messenger - Mock message sender
//
// Stands in for a chat gateway: every sent message is appended to a text log
// as "[<timestamp>] <message>". Credentials come from an injected
// SecretProvider and are checked on each send; nothing is kept in process state.

use chrono::{Local, SecondsFormat};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_USERNAME_KEY: &str = "MESSENGER_USERNAME";
pub const DEFAULT_PASSWORD_KEY: &str = "MESSENGER_PASSWORD";

// ============================================================================
// SECRETS
// ============================================================================

/// Source of credentials for the sender.
pub trait SecretProvider: Send + Sync {
    fn secret(&self, key: &str) -> Option<String>;
}

/// Reads secrets from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

impl SecretProvider for EnvSecretProvider {
    fn secret(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed in-memory secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.secrets.insert(key.to_string(), value.to_string());
        self
    }
}

impl SecretProvider for StaticSecretProvider {
    fn secret(&self, key: &str) -> Option<String> {
        self.secrets.get(key).cloned()
    }
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MessengerConfig {
    /// Text log the messages are appended to
    pub log_path: PathBuf,

    /// Secret key holding the account username
    pub username_key: String,

    /// Secret key holding the account password
    pub password_key: String,
}

impl MessengerConfig {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        MessengerConfig {
            log_path: log_path.into(),
            username_key: DEFAULT_USERNAME_KEY.to_string(),
            password_key: DEFAULT_PASSWORD_KEY.to_string(),
        }
    }
}

// ============================================================================
// SEND
// ============================================================================

/// Append `message` to the log and return the confirmation string.
///
/// Line breaks inside the message are folded into single spaces so that every
/// call adds exactly one log line.
pub fn send_message(
    config: &MessengerConfig,
    secrets: &dyn SecretProvider,
    message: &str,
) -> Result<String> {
    if message.trim().is_empty() {
        return Err(Error::MissingField("message"));
    }

    let username = secrets
        .secret(&config.username_key)
        .ok_or_else(|| Error::MissingSecret(config.username_key.clone()))?;
    secrets
        .secret(&config.password_key)
        .ok_or_else(|| Error::MissingSecret(config.password_key.clone()))?;

    let path = &config.log_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let message = single_line(message);
    let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
    // One write per line: O_APPEND keeps concurrent senders from splicing lines
    let line = format!("[{timestamp}] {message}\n");

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(line.as_bytes()).map_err(|e| Error::io(path, e))?;

    tracing::info!(user = %username, "Message sent ({} bytes)", message.len());

    Ok(format!("Message sent: {message}"))
}

fn single_line(message: &str) -> String {
    message
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
