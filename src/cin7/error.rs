use reqwest::StatusCode;
use thiserror::Error;

use crate::retry::IsTransient;

/// Failure talking to the Cin7 API
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
}

impl UpstreamError {
    pub fn endpoint(&self) -> &str {
        match self {
            UpstreamError::Status { endpoint, .. }
            | UpstreamError::Transport { endpoint, .. }
            | UpstreamError::Malformed { endpoint, .. } => endpoint,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(status.as_u16()),
            UpstreamError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            UpstreamError::Malformed { .. } => None,
        }
    }
}

/// 429 and gateway-class 5xx responses
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

impl IsTransient for UpstreamError {
    fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Status { status, .. } => is_transient_status(*status),
            UpstreamError::Transport { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            UpstreamError::Malformed { .. } => false,
        }
    }
}
