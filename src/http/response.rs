//! Error responses at the request boundary.
//!
//! # Responsibilities
//! - Map each failure kind to an HTTP status code
//! - Keep caller-visible messages short; detail goes to the logs
//!
//! # Design Decisions
//! - Every failure is handled per request: one failing request never
//!   affects concurrent requests or process state
//! - Configuration problems (empty or malformed origin URL) are 500s;
//!   upstream failures are 502s

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures that terminate a single proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The inbound body stream could not be fully read.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The resolved origin URL is empty.
    #[error("no origin URL configured for the resolved condition")]
    TargetUnconfigured,

    /// The resolved origin URL is not an absolute http/https URL.
    #[error("malformed origin URL '{0}'")]
    MalformedTarget(String),

    /// The upstream request failed (connect error, reset, timeout).
    #[error("upstream request failed: {0}")]
    Upstream(#[source] hyper_util::client::legacy::Error),
}

impl ProxyError {
    /// Status code relayed to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::TargetUnconfigured | ProxyError::MalformedTarget(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match &self {
            ProxyError::BodyRead(_) => "Failed to read request body",
            ProxyError::TargetUnconfigured | ProxyError::MalformedTarget(_) => {
                "No valid origin configured"
            }
            ProxyError::Upstream(_) => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}
