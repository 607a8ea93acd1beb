use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::models::*;
use crate::{
    config::Config,
    error::AppResult,
    middleware::parse_order_batch,
    sync::SyncService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sync: Arc<SyncService>,
}

/// Mark Cin7 orders dispatched for a batch of Shopify orders
/// POST /shopify-orders
///
/// Caller is already authenticated by `require_api_key`.
pub async fn sync_orders(State(state): State<AppState>, body: Bytes) -> AppResult<Json<SyncResponse>> {
    let batch = parse_order_batch(&body)?;
    info!("📦 Received batch of {} orders", batch.orders.len());

    let outcome = state.sync.run(&batch, Utc::now()).await?;

    Ok(Json(SyncResponse::from(outcome)))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}
