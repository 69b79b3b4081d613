//! Deployment probe.
//!
//! # Data Flow
//! ```text
//! default_suite() (case.rs)
//!     → ProbeRunner::run_all (runner.rs, sequential, one attempt each)
//!     → ProbeReport (report.rs: counts, failures, exit code)
//! ```
//!
//! Only status codes decide pass/fail. Body checks are advisory.

pub mod case;
pub mod report;
pub mod runner;

pub use case::{default_suite, ProbeBody, ProbeCase};
pub use report::ProbeReport;
pub use runner::{BodyCheck, ProbeError, ProbeOutcome, ProbeRunner, ProbeVerdict, DEFAULT_PROBE_TIMEOUT};
