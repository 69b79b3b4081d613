//! Deployment probe: runs the fixed request suite against a base URL and
//! exits 0 only when every status code matched.
//!
//! The base URL comes from `PROBE_BASE_URL` (default `http://127.0.0.1:8001`).

use std::process::ExitCode;

use api_forwarder::observability::init_cli_logging;
use api_forwarder::probe::{default_suite, ProbeRunner, DEFAULT_PROBE_TIMEOUT};

const BASE_URL_ENV: &str = "PROBE_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_cli_logging();

    let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let runner = ProbeRunner::new(base_url, DEFAULT_PROBE_TIMEOUT)?;

    println!("🚀 Starting backend API probes against {}", runner.base_url());
    println!("{}", "=".repeat(50));

    let report = runner.run_all(&default_suite()).await;
    report.print_summary();

    Ok(ExitCode::from(report.exit_code()))
}
