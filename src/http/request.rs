//! Inbound request preparation.
//!
//! # Responsibilities
//! - Pick a request ID for log correlation (never forwarded as a header)
//! - Derive the outbound header set from the inbound one
//!
//! The outbound request targets a different authority, so `host` is
//! dropped and the client fills it in from the upstream URL. The body is
//! buffered before forwarding, which makes the inbound `transfer-encoding`
//! meaningless on the outbound leg.

use axum::http::{
    header::{HOST, TRANSFER_ENCODING},
    HeaderMap,
};
use uuid::Uuid;

/// Header name for request IDs.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Inbound headers that are never copied to the upstream request.
pub static STRIPPED_REQUEST_HEADERS: [axum::http::HeaderName; 2] = [HOST, TRANSFER_ENCODING];

/// Copy every inbound header except the stripped ones.
///
/// Repeated headers keep all of their values.
pub fn build_upstream_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    for name in &STRIPPED_REQUEST_HEADERS {
        headers.remove(name);
    }
    headers
}

/// The caller's `x-request-id`, or a fresh UUID v4.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
