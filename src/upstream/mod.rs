//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! inbound URI
//!     → target.rs (base URL + path + query)
//!     → client.rs (one request, fixed timeout, no retries)
//!     → UpstreamResponse | ForwardError
//!     → error.rs (ForwardError → 503 / 504 / 502 JSON)
//! ```

pub mod client;
pub mod error;
pub mod target;

pub use client::{UpstreamClient, UpstreamResponse};
pub use error::ForwardError;
pub use target::UpstreamTarget;
