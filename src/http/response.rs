//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn an upstream response into the client response
//! - Drop framing headers the serving layer recomputes
//! - Build the JSON error bodies used for forwarding failures
//!
//! The body is passed through byte for byte. `content-length`,
//! `transfer-encoding` and `content-encoding` describe the upstream leg;
//! the upstream client has already decoded the body, so copying them would
//! produce length mismatches or double decoding on the client.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING},
        HeaderMap, HeaderName, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::upstream::error::UPSTREAM_NOT_READY;
use crate::upstream::UpstreamResponse;

/// Upstream response headers that are never copied to the client.
pub static EXCLUDED_RESPONSE_HEADERS: [HeaderName; 3] =
    [TRANSFER_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH];

/// Copy upstream headers minus the excluded ones.
///
/// Header names are case-insensitive; `HeaderName` normalizes them, so the
/// comparison is too.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        if EXCLUDED_RESPONSE_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Build the client response: upstream status, filtered headers, same body.
pub fn into_client_response(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = filter_response_headers(&upstream.headers);
    response
}

/// `{"error": <message>}` with the given status and `application/json`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// The fixed 503 returned when the upstream is not accepting connections.
pub fn upstream_unavailable() -> Response {
    json_error(StatusCode::SERVICE_UNAVAILABLE, UPSTREAM_NOT_READY)
}
