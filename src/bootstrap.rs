use std::sync::Arc;
use tracing::info;

use crate::{
    api::handler::AppState,
    cin7::{Cin7Client, FulfillmentPlatform},
    config::Config,
    error::AppResult,
    sync::{SchedulePolicy, SyncService},
};

pub fn initialize_app_state(config: Config) -> AppResult<AppState> {
    info!("Initializing application components ...");

    let cin7 = Cin7Client::new(&config.cin7, config.retry.clone())?;
    info!(
        "✅ Cin7 client initialized (page size {}, timeout {:?}, {} attempts)",
        config.cin7.page_size, config.cin7.timeout, config.retry.max_attempts
    );

    let platform: Arc<dyn FulfillmentPlatform> = Arc::new(cin7);
    Ok(build_state(config, platform))
}

/// Wire the sync pipeline around any fulfillment platform
pub fn build_state(config: Config, platform: Arc<dyn FulfillmentPlatform>) -> AppState {
    let schedule = SchedulePolicy::new(config.skip_weekdays.clone());
    if !schedule.skip_weekdays.is_empty() {
        info!("📅 Batches are skipped on {:?}", schedule.skip_weekdays);
    }

    info!(
        "✅ Sync pipeline ready ({} lookback: {} day(s))",
        platform.name(),
        config.lookback.num_days()
    );
    let sync = Arc::new(SyncService::new(platform, schedule, config.lookback));

    AppState {
        config: Arc::new(config),
        sync,
    }
}
