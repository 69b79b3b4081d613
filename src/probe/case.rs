//! Probe definitions and the default suite.

use reqwest::Method;
use serde_json::{json, Value};

/// What a probe sends as its request body.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeBody {
    Empty,
    /// Serialized JSON.
    Json(Value),
    /// Sent verbatim, e.g. deliberately malformed JSON.
    Raw(String),
}

/// One request and the status it must produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeCase {
    pub name: String,
    /// Heading printed before the first probe of a group.
    pub section: String,
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub body: ProbeBody,
    pub expected_status: u16,
    /// Advisory: expected `error.code` in the JSON response.
    pub expected_error_code: Option<String>,
}

impl ProbeCase {
    pub fn new(name: impl Into<String>, method: Method, path: impl Into<String>, expected_status: u16) -> Self {
        Self {
            name: name.into(),
            section: String::new(),
            method,
            path: path.into(),
            body: ProbeBody::Empty,
            expected_status,
            expected_error_code: None,
        }
    }

    pub fn get(name: impl Into<String>, path: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, Method::GET, path, expected_status)
    }

    pub fn post(name: impl Into<String>, path: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, Method::POST, path, expected_status)
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = ProbeBody::Json(body);
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = ProbeBody::Raw(body.into());
        self
    }

    pub fn expect_error_code(mut self, code: impl Into<String>) -> Self {
        self.expected_error_code = Some(code.into());
        self
    }
}

pub const BASIC_SECTION: &str = "📋 Testing Basic Endpoints...";
pub const SEARCH_SECTION: &str = "🔍 Testing Search Functionality...";

/// The fixed checks run against a deployed instance.
///
/// The valid search expects 520: the deployment has no marketplace
/// credentials, and the search route reports that as `SERVICE_UNAVAILABLE`.
pub fn default_suite() -> Vec<ProbeCase> {
    vec![
        ProbeCase::get("Health Check", "/api/health", 200).in_section(BASIC_SECTION),
        ProbeCase::get("Search Status", "/api/search/status", 200).in_section(BASIC_SECTION),
        ProbeCase::get("Cache Statistics", "/api/search/cache/stats", 200).in_section(BASIC_SECTION),
        ProbeCase::post("Valid Search - Service Unavailable", "/api/search", 520)
            .in_section(SEARCH_SECTION)
            .with_json(json!({
                "keywords": "laptop",
                "minPrice": 100,
                "maxPrice": 1000,
                "condition": ["new"]
            }))
            .expect_error_code("SERVICE_UNAVAILABLE"),
        ProbeCase::post("Search with Empty Keywords", "/api/search", 400)
            .in_section(SEARCH_SECTION)
            .with_json(json!({
                "keywords": "",
                "minPrice": 100,
                "maxPrice": 1000
            })),
        ProbeCase::post("Search with Invalid JSON", "/api/search", 400)
            .in_section(SEARCH_SECTION)
            .with_raw_body("invalid json"),
    ]
}
