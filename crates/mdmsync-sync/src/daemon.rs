//! Repeated runs on a fixed interval.

use crate::error::SyncResult;
use crate::outcome::RunSummary;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

/// Run `run` every `interval` until `shutdown` resolves.
///
/// A failed run is logged and the loop sleeps before trying again. When
/// `shutdown` fires, an in-flight run or sleep is dropped and the loop
/// returns the number of runs that completed.
pub async fn run_daemon<F, Fut, S>(interval: Duration, shutdown: S, mut run: F) -> u64
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = SyncResult<RunSummary>>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut completed = 0;

    loop {
        let run_no = completed + 1;
        info!(run = run_no, "Starting daemon run");

        let result = tokio::select! {
            result = run(run_no) => result,
            () = &mut shutdown => {
                info!("Received interrupt signal, exiting daemon mode");
                break;
            }
        };
        completed += 1;

        match result {
            Ok(summary) => info!(
                run = run_no,
                processed = summary.processed,
                failed = summary.failed,
                interval_secs = interval.as_secs(),
                "Run finished, sleeping"
            ),
            Err(e) => error!(
                run = run_no,
                error = %e,
                interval_secs = interval.as_secs(),
                "Error in daemon run, sleeping before retry"
            ),
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = &mut shutdown => {
                info!("Received interrupt signal, exiting daemon mode");
                break;
            }
        }
    }

    completed
}
