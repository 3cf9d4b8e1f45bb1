//! Per-device reconciliation and the per-run platform loop.
//!
//! A run walks the configured platforms in order. Each device goes through
//! [`reconcile_device`], which never fails: errors become a
//! [`DeviceOutcome::Failed`] and the loop moves on. A platform whose device
//! list cannot be fetched is logged and the next platform is attempted.

use crate::assignment::AssignmentAction;
use crate::context::SyncContext;
use crate::error::SyncResult;
use crate::outcome::{DeviceOutcome, RunSummary, SkipReason};
use chrono::Utc;
use mdmsync_core::{AssetId, Device, Platform};
use mdmsync_mosyle::DeviceQuery;
use mdmsync_snipeit::HardwareRow;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Run the driver once over every configured platform.
pub async fn run_once(ctx: &SyncContext<'_>) -> RunSummary {
    let options = ctx.options;
    let query = options
        .list_mode
        .query_at(Utc::now(), options.timestamp_lookback);
    info!(mode = %options.list_mode, platforms = options.platforms.len(), "Starting synchronization run");

    let mut summary = RunSummary::default();
    for &platform in &options.platforms {
        let span = info_span!("platform", platform = %platform);
        if let Err(e) = sync_platform(ctx, platform, &query, &mut summary)
            .instrument(span)
            .await
        {
            error!(platform = %platform, error = %e, "Error processing device type");
        }
    }

    info!(
        processed = summary.processed,
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        "Synchronization run complete"
    );
    summary
}

async fn sync_platform(
    ctx: &SyncContext<'_>,
    platform: Platform,
    query: &DeviceQuery,
    summary: &mut RunSummary,
) -> SyncResult<()> {
    let devices = ctx.source.list_devices(platform, query).await?;
    info!(count = devices.len(), "Fetched devices from Mosyle");

    ctx.progress.begin(platform, devices.len() as u64);
    for (index, device) in devices.iter().enumerate() {
        let span = info_span!(
            "device",
            index = index + 1,
            serial = device.serial().unwrap_or("<none>")
        );
        let outcome = reconcile_device(ctx, device).instrument(span.clone()).await;
        span.in_scope(|| log_outcome(&outcome));
        summary.record(&outcome);
        ctx.progress.advance();
    }
    ctx.progress.finish(platform);

    info!(processed = summary.processed, "Finished device type");
    Ok(())
}

fn log_outcome(outcome: &DeviceOutcome) {
    match outcome {
        DeviceOutcome::Created | DeviceOutcome::Updated => debug!(?outcome, "Device reconciled"),
        DeviceOutcome::Skipped(reason @ SkipReason::UnknownOs(_)) => {
            error!(reason = %reason, "Skipping device");
        }
        DeviceOutcome::Skipped(reason) => warn!(reason = %reason, "Skipping device"),
        DeviceOutcome::Failed(reason) => error!(reason = %reason, "Failed to process device"),
    }
}

/// Bring one device's asset in line with the MDM record.
pub async fn reconcile_device(ctx: &SyncContext<'_>, device: &Device) -> DeviceOutcome {
    match try_reconcile(ctx, device).await {
        Ok(outcome) => outcome,
        Err(e) => DeviceOutcome::Failed(e.to_string()),
    }
}

async fn try_reconcile(ctx: &SyncContext<'_>, device: &Device) -> SyncResult<DeviceOutcome> {
    let Some(serial) = device.serial() else {
        return Ok(DeviceOutcome::Skipped(SkipReason::MissingSerial));
    };

    let lookup = ctx.store.find_asset_by_serial(serial).await?;
    let existing = match (lookup.total, lookup.rows.first()) {
        (0, _) => None,
        (1, Some(row)) => Some(row),
        (1, None) => {
            return Ok(DeviceOutcome::Failed(
                "asset lookup reported one match but returned no rows".to_string(),
            ))
        }
        (total, _) => return Ok(DeviceOutcome::Skipped(SkipReason::AmbiguousSerial(total))),
    };

    let Some(model_name) = device.model() else {
        return Ok(DeviceOutcome::Skipped(SkipReason::MissingModel));
    };
    let model_id = match ctx.store.find_model(model_name).await? {
        Some(model) => model.id,
        None => {
            let Some(platform) = device.platform() else {
                return Ok(DeviceOutcome::Skipped(SkipReason::UnknownOs(
                    device.os_raw().to_string(),
                )));
            };
            info!(model = model_name, "Creating new model");
            ctx.store.create_model(platform, model_name).await?
        }
    };

    let intended = device.intended_assignee();
    let payload = ctx.store.build_asset_payload(device);

    let Some(row) = existing else {
        info!(model = model_name, "Creating new asset");
        let asset_id = ctx.store.create_asset(model_id, payload).await?;
        if let Some(email) = intended {
            assign(ctx, email, asset_id).await;
        }
        return Ok(DeviceOutcome::Created);
    };

    info!(asset_id = %row.id, "Updating asset");
    ctx.store
        .update_asset(row.id, payload, Some(model_id))
        .await?;
    reconcile_assignment(ctx, row, intended).await;
    sync_asset_tag(ctx, device, serial, row).await;
    Ok(DeviceOutcome::Updated)
}

async fn reconcile_assignment(ctx: &SyncContext<'_>, row: &HardwareRow, intended: Option<&str>) {
    match AssignmentAction::plan(row.assigned_to.as_ref(), intended) {
        AssignmentAction::Keep => debug!("Assignment unchanged"),
        AssignmentAction::Assign(email) => {
            info!(email = %email, "Assigning asset to user");
            assign(ctx, &email, row.id).await;
        }
        AssignmentAction::Unassign => {
            info!(asset_id = %row.id, "Unassigning asset");
            if let Err(e) = ctx.store.unassign(row.id).await {
                warn!(error = %e, "Failed to check asset in");
            }
        }
        AssignmentAction::Reassign(email) => {
            let from = row.assigned_to.as_ref().map_or("<unknown>", |a| a.display());
            info!(from, to = %email, "Reassigning asset");
            if let Err(e) = ctx.store.unassign(row.id).await {
                warn!(error = %e, "Failed to check asset in, not reassigning");
                return;
            }
            assign(ctx, &email, row.id).await;
        }
    }
}

async fn assign(ctx: &SyncContext<'_>, email: &str, asset_id: AssetId) {
    match ctx.store.assign_user(email, asset_id).await {
        Ok(true) => {}
        Ok(false) => info!(email, "No Snipe-IT user matches this email, asset left unassigned"),
        Err(e) => warn!(email, error = %e, "Failed to assign asset"),
    }
}

/// Push the Snipe-IT asset tag to Mosyle when they differ.
async fn sync_asset_tag(ctx: &SyncContext<'_>, device: &Device, serial: &str, row: &HardwareRow) {
    let Some(tag) = row.tag() else {
        return;
    };
    if device.mdm_asset_tag() == Some(tag) {
        return;
    }
    info!(tag, "Syncing asset tag to Mosyle");
    if let Err(e) = ctx.source.set_asset_tag(serial, tag).await {
        warn!(tag, error = %e, "Failed to store asset tag in Mosyle");
    }
}
