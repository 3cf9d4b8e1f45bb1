//! mdmsync - synchronize Apple devices from Mosyle to Snipe-IT
//!
//! Runs once by default; `--daemon` repeats the sync every `--interval`
//! seconds until Ctrl-C.

use clap::Parser;
use mdmsync::error::CliResult;
use mdmsync::logging::{init_logging, LogLevel};
use mdmsync::settings::Settings;
use mdmsync::sync_once;
use mdmsync_sync::run_daemon;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// Synchronize Apple devices from Mosyle to Snipe-IT
#[derive(Parser)]
#[command(name = "mdmsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run continuously, syncing every --interval seconds
    #[arg(long)]
    daemon: bool,

    /// Seconds between runs in daemon mode
    #[arg(long, default_value_t = 3600, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Path to the settings file
    #[arg(long, default_value = "settings.ini")]
    config: PathBuf,

    /// Log level
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            error!(error = %e, "Fatal error");
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    init_logging(cli.log_level, &cli.log_dir)?;

    info!(
        mode = if cli.daemon { "daemon" } else { "one-time" },
        "mdmsync started"
    );
    let settings = Settings::load(&cli.config)?;

    if !cli.daemon {
        let summary = sync_once(&settings).await?;
        info!(processed = summary.processed, "Exiting");
        return Ok(());
    }

    info!(interval_secs = cli.interval, "Entering daemon mode");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    };
    let runs = run_daemon(Duration::from_secs(cli.interval), shutdown, |_| {
        sync_once(&settings)
    })
    .await;
    info!(runs, "Daemon stopped");
    Ok(())
}
