//! HTTP forwarding shim for a Next.js API, plus a deployment probe.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod upstream;

pub use config::schema::ForwarderConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
