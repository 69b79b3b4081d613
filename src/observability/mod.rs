//! Observability subsystem.
//!
//! Logging only: structured `tracing` events, with request spans from
//! tower-http's `TraceLayer`. Each forwarded exchange carries a request ID
//! in its log fields.

pub mod logging;

pub use logging::{init_cli_logging, init_logging};
