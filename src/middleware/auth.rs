use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::api::handler::AppState;
use crate::error::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Compare secrets without short-circuiting on the first differing byte.
/// Hashing first makes both inputs the same length.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Reject requests whose `X-Api-Key` does not match the configured secret
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|key| keys_match(key, &state.config.api_key));

    match verdict {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            warn!(path = %req.uri().path(), "Rejected request with invalid API key");
            Err(AppError::Unauthorized)
        }
        None => {
            warn!(path = %req.uri().path(), "Rejected request without API key");
            Err(AppError::Unauthorized)
        }
    }
}
