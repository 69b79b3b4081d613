//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, method filter, body limit)
//!     → request.rs (request ID, outbound header set)
//!     → [upstream client relays the request]
//!     → response.rs (status + filtered headers + body, or JSON error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{build_upstream_headers, request_id, X_REQUEST_ID};
pub use response::{filter_response_headers, upstream_unavailable, EXCLUDED_RESPONSE_HEADERS};
pub use server::{AppState, HttpServer, ServerError};
