//! Console and rolling file logging.

use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "mdmsync.log";

/// `--log-level` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Install stdout and daily-rotated file logging.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LogLevel, log_dir: &Path) -> CliResult<()> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        CliError::Logging(format!("cannot create {}: {e}", log_dir.display()))
    })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.directive()))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
