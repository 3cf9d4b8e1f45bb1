//! CLI error types and exit codes

use crate::settings::SettingsError;
use mdmsync_mosyle::MosyleError;
use mdmsync_snipeit::SnipeError;
use mdmsync_sync::SyncError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General or configuration error
/// - 3: Network error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Sync failed: {0}")]
    Sync(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Network(_) => 3,
            CliError::Server(_) => 5,
            CliError::Config(_) | CliError::Logging(_) | CliError::Sync(_) => 1,
        }
    }

    /// Print the error to stderr
    pub fn print(&self) {
        if std::env::var("NO_COLOR").is_err() {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        } else {
            eprintln!("Error: {self}");
        }
        if let Some(suggestion) = self.suggestion() {
            eprintln!("\nSuggestion: {suggestion}");
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some("Check settings.ini against settings.example.ini."),
            CliError::Network(_) => Some("Check your network connection and the API URLs."),
            _ => None,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        let message = e.to_string();
        match e {
            SyncError::Mosyle(MosyleError::Http(_)) => CliError::Network(message),
            SyncError::Mosyle(MosyleError::Api { status, .. }) if status >= 500 => {
                CliError::Server(message)
            }
            SyncError::Snipe(SnipeError::RetriesExhausted { .. }) => CliError::Network(message),
            SyncError::Snipe(SnipeError::InvalidConfig(_)) => CliError::Config(message),
            _ => CliError::Sync(message),
        }
    }
}
