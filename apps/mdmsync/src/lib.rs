//! mdmsync binary support.
//!
//! Exposes settings loading and the single-run entry point for integration
//! tests; `main.rs` only parses flags and drives the loop.

pub mod error;
pub mod logging;
pub mod progress;
pub mod settings;

use mdmsync_mosyle::MosyleClient;
use mdmsync_snipeit::SnipeClient;
use mdmsync_sync::{run_once, RunSummary, SyncContext, SyncResult};
use progress::BarProgress;
use settings::Settings;
use tracing::info;

/// Log in to both systems and run the driver once.
pub async fn sync_once(settings: &Settings) -> SyncResult<RunSummary> {
    info!("=== Starting synchronization run ===");

    let mosyle = MosyleClient::login(settings.mosyle.clone()).await?;
    info!("Successfully connected to Mosyle");

    let snipe = SnipeClient::new(settings.snipe.clone())?;
    info!(url = %settings.snipe.url, "Snipe-IT client ready");

    let progress = BarProgress::new();
    let ctx = SyncContext::new(&mosyle, &snipe, &progress, &settings.sync);
    Ok(run_once(&ctx).await)
}
