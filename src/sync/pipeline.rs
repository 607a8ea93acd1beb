use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::cin7::traits::FulfillmentPlatform;
use crate::error::{AppError, AppResult};
use crate::orders::{OrderBatch, UpdateReport};
use crate::sync::{reconciler::reconcile, resolve_date_range, SchedulePolicy};

/// Result of processing one inbound batch
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Schedule policy declined to run
    Skipped { reason: String },
    /// Nothing needed updating
    NoOp { fetched: usize },
    /// Every matched order was updated
    Updated {
        fetched: usize,
        matched: usize,
        report: UpdateReport,
    },
}

/// Runs schedule check → resolve → fetch → reconcile → update for a batch
pub struct SyncService {
    platform: Arc<dyn FulfillmentPlatform>,
    schedule: SchedulePolicy,
    lookback: Duration,
}

impl SyncService {
    pub fn new(platform: Arc<dyn FulfillmentPlatform>, schedule: SchedulePolicy, lookback: Duration) -> Self {
        Self {
            platform,
            schedule,
            lookback,
        }
    }

    pub async fn run(&self, batch: &OrderBatch, now: DateTime<Utc>) -> AppResult<SyncOutcome> {
        let sync_id = Uuid::new_v4();
        let span = tracing::info_span!("sync", %sync_id, orders = batch.orders.len());
        self.run_inner(batch, now).instrument(span).await
    }

    async fn run_inner(&self, batch: &OrderBatch, now: DateTime<Utc>) -> AppResult<SyncOutcome> {
        if let Some(reason) = self.schedule.should_skip(now) {
            info!("⏸️ Skipping batch: {}", reason);
            return Ok(SyncOutcome::Skipped { reason });
        }

        if batch.orders.is_empty() {
            info!("Empty order batch, nothing to do");
            return Ok(SyncOutcome::NoOp { fetched: 0 });
        }

        let range = resolve_date_range(&batch.orders, self.lookback)?;
        info!(
            "⚙️ Fetching {} orders created {} .. {}",
            self.platform.name(),
            range.start_param(),
            range.end_param()
        );

        let remote = self.platform.fetch_orders(&range).await.map_err(|e| {
            error!(endpoint = %e.endpoint(), status = ?e.status(), "Order fetch failed: {}", e);
            AppError::UpstreamFetchFailure(e)
        })?;
        let fetched = remote.len();

        let outside = remote
            .iter()
            .filter(|o| o.created_date.map_or(false, |ts| !range.contains(&ts)))
            .count();
        if outside > 0 {
            warn!(outside, "Platform returned orders created outside the requested range");
        }

        let updates = reconcile(&batch.orders, &remote);
        if updates.is_empty() {
            info!("✓ No undispatched matches among {} fetched orders", fetched);
            return Ok(SyncOutcome::NoOp { fetched });
        }

        let matched = updates.len();
        info!("Submitting {} dispatch updates", matched);
        let report = self.platform.update_orders(&updates).await;

        if !report.is_complete() {
            for failed in &report.failed {
                warn!(id = %failed.id, reason = %failed.reason, "Dispatch update failed");
            }
            return Err(AppError::UpstreamUpdateFailure {
                updated: report.updated,
                failed: report.failed,
            });
        }

        info!("✓ Marked {} orders dispatched", report.updated.len());
        Ok(SyncOutcome::Updated {
            fetched,
            matched,
            report,
        })
    }
}
