//! Upstream address resolution.
//!
//! Maps the path and query of an inbound request onto the fixed upstream
//! origin. The base URL may carry a path prefix; the inbound path is
//! appended to it.
//!
//! The path goes through `Url::set_path`, which resolves dot segments:
//! `/api/../secret` and `/api/%2e%2e/secret` both reach the upstream as
//! `/secret`.

use axum::http::Uri;
use url::Url;

/// The fixed upstream every request is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    base_url: Url,
}

impl UpstreamTarget {
    /// Parse the configured upstream base URL.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(raw)?,
        })
    }

    /// Outbound URL for an inbound request URI: same path after dot-segment
    /// normalization, same query.
    pub fn url_for(&self, uri: &Uri) -> Url {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, uri.path()));
        url.set_query(uri.query());
        url
    }
}
