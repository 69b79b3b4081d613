//! Sequential probe execution.
//!
//! # Responsibilities
//! - Send each probe once, in order, with a fixed timeout
//! - Print the request, observed status and a response preview
//! - Turn every failure (mismatch, timeout, transport) into a verdict
//!
//! A failing probe never stops the run.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::probe::case::{ProbeBody, ProbeCase};
use crate::probe::report::ProbeReport;

/// Per-request timeout used by the probe binary.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// How a single probe ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Passed,
    StatusMismatch { expected: u16, actual: u16 },
    TimedOut,
    Failed(String),
}

impl ProbeVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, ProbeVerdict::Passed)
    }
}

/// Result of the advisory `error.code` check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyCheck {
    Matched,
    Unexpected,
}

/// Everything observed for one probe.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub name: String,
    pub url: String,
    pub status: Option<u16>,
    pub verdict: ProbeVerdict,
    pub body_check: Option<BodyCheck>,
}

impl ProbeOutcome {
    /// One-line failure description for the summary, `None` when passed.
    pub fn failure_message(&self) -> Option<String> {
        match &self.verdict {
            ProbeVerdict::Passed => None,
            ProbeVerdict::StatusMismatch { expected, actual } => {
                Some(format!("{}: Expected {}, got {}", self.name, expected, actual))
            }
            ProbeVerdict::TimedOut => Some(format!("{}: Request timed out", self.name)),
            ProbeVerdict::Failed(error) => Some(format!("{}: {}", self.name, error)),
        }
    }
}

/// Runs probes against one base URL.
pub struct ProbeRunner {
    base_url: String,
    client: reqwest::Client,
}

impl ProbeRunner {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProbeError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run every case in order and collect the outcomes.
    pub async fn run_all(&self, cases: &[ProbeCase]) -> ProbeReport {
        let mut report = ProbeReport::default();
        let mut section: Option<&str> = None;

        for case in cases {
            if !case.section.is_empty() && section != Some(case.section.as_str()) {
                println!("\n{}", case.section);
                section = Some(case.section.as_str());
            }
            report.record(self.run_case(case).await);
        }
        report
    }

    /// Send one probe and judge it by status code alone.
    pub async fn run_case(&self, case: &ProbeCase) -> ProbeOutcome {
        let url = format!("{}{}", self.base_url, case.path);
        println!("\n🔍 Testing {}...", case.name);
        println!("   URL: {}", url);

        let mut request = self
            .client
            .request(case.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        request = match &case.body {
            ProbeBody::Empty => request,
            ProbeBody::Json(value) => request.body(value.to_string()),
            ProbeBody::Raw(text) => request.body(text.clone()),
        };

        let outcome = |status, verdict, body_check| ProbeOutcome {
            name: case.name.clone(),
            url: url.clone(),
            status,
            verdict,
            body_check,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return outcome(None, transport_verdict(e), None),
        };

        let status = response.status().as_u16();
        println!("   Status Code: {}", status);

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return outcome(Some(status), transport_verdict(e), None),
        };
        let json: Option<Value> = serde_json::from_str(&text).ok();
        match &json {
            Some(value) => println!("   Response: {}...", preview(&pretty(value))),
            None => println!("   Response Text: {}...", preview(&text)),
        }

        if status != case.expected_status {
            println!("❌ Failed - Expected {}, got {}", case.expected_status, status);
            let verdict = ProbeVerdict::StatusMismatch {
                expected: case.expected_status,
                actual: status,
            };
            return outcome(Some(status), verdict, None);
        }

        println!("✅ Passed - Status: {}", status);
        let body_check = case
            .expected_error_code
            .as_deref()
            .map(|code| check_error_code(json.as_ref(), code));
        outcome(Some(status), ProbeVerdict::Passed, body_check)
    }
}

fn transport_verdict(err: reqwest::Error) -> ProbeVerdict {
    if err.is_timeout() {
        println!("❌ Failed - Request timed out");
        ProbeVerdict::TimedOut
    } else {
        println!("❌ Failed - Error: {}", err);
        ProbeVerdict::Failed(err.to_string())
    }
}

fn check_error_code(json: Option<&Value>, code: &str) -> BodyCheck {
    let actual = json.and_then(|v| v.pointer("/error/code")).and_then(Value::as_str);
    if actual == Some(code) {
        println!("✅ Service unavailable error message is correct");
        BodyCheck::Matched
    } else {
        println!("⚠️  Unexpected response format");
        BodyCheck::Unexpected
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// First 200 characters, never splitting a code point.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
