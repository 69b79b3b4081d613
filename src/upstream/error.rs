//! Forwarding failures and their mapping to client responses.
//!
//! | Failure | Status | Body |
//! |---|---|---|
//! | upstream refused / unreachable | 503 | `{"error":"Next.js server not ready"}` |
//! | upstream exceeded the timeout | 504 | `{"error":"Upstream request timed out"}` |
//! | any other transport fault | 502 | `{"error":"Upstream request failed"}` |
//! | inbound body rejected | rejection status (413 for oversize) | rejection text |

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use thiserror::Error;

use crate::http::response::{json_error, upstream_unavailable};

/// Body returned when the upstream cannot be connected to.
pub const UPSTREAM_NOT_READY: &str = "Next.js server not ready";
pub const UPSTREAM_TIMED_OUT: &str = "Upstream request timed out";
pub const UPSTREAM_FAILED: &str = "Upstream request failed";

/// Why a request could not be relayed.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The upstream refused the connection or is not listening.
    #[error("upstream connection failed: {0}")]
    ConnectFailed(#[source] reqwest::Error),

    /// No complete response within the configured timeout.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// Connected, but the exchange broke down.
    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The inbound body could not be buffered (e.g. over the size limit).
    #[error("inbound body rejected: {0}")]
    InboundBody(#[from] BytesRejection),
}

impl ForwardError {
    /// Classify a client error. Timeouts are checked first so a connect
    /// attempt that hit the deadline reports as a timeout.
    pub fn from_client(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout(timeout)
        } else if err.is_connect() {
            ForwardError::ConnectFailed(err)
        } else {
            ForwardError::Transport(err)
        }
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::ConnectFailed(_) => "connect_failed",
            ForwardError::Timeout(_) => "timeout",
            ForwardError::Transport(_) => "transport",
            ForwardError::InboundBody(_) => "inbound_body",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::ConnectFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Transport(_) => StatusCode::BAD_GATEWAY,
            ForwardError::InboundBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ForwardError::ConnectFailed(_) => upstream_unavailable(),
            ForwardError::Timeout(_) => json_error(status, UPSTREAM_TIMED_OUT),
            ForwardError::Transport(_) => json_error(status, UPSTREAM_FAILED),
            ForwardError::InboundBody(rejection) => json_error(status, &rejection.body_text()),
        }
    }
}
