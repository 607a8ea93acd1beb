use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::orders::models::RemoteOrderId;
use crate::sync::SyncOutcome;

// ========== RESPONSE MODELS ==========

/// Webhook processing response
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub fetched: usize,
    pub matched: usize,
    pub updated: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updated_ids: Vec<RemoteOrderId>,
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Skipped { reason } => Self {
                message: reason,
                fetched: 0,
                matched: 0,
                updated: 0,
                updated_ids: Vec::new(),
            },
            SyncOutcome::NoOp { fetched } => Self {
                message: "No updates to process".to_string(),
                fetched,
                matched: 0,
                updated: 0,
                updated_ids: Vec::new(),
            },
            SyncOutcome::Updated {
                fetched,
                matched,
                report,
            } => Self {
                message: "Orders updated successfully".to_string(),
                fetched,
                matched,
                updated: report.updated.len(),
                updated_ids: report.updated,
            },
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
