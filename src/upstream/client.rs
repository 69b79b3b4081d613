//! Outbound HTTP client for the upstream.
//!
//! # Responsibilities
//! - Issue exactly one request per inbound request (no retries)
//! - Bound the whole exchange, body included, by the configured timeout
//! - Open a fresh connection per request (no idle pool)
//! - Decode compressed bodies so `content-encoding` can be dropped safely
//! - Never follow redirects; 3xx responses go back to the caller as-is

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

use crate::upstream::error::ForwardError;

/// A fully read upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Client bound to a single timeout.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .redirect(Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Send one request and read the complete response.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, ForwardError> {
        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| ForwardError::from_client(e, self.timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ForwardError::from_client(e, self.timeout))?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
