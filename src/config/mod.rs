//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (bind address, upstream URL)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!     → handed to HttpServer at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ForwarderConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, UpstreamConfig,
};
pub use validation::ValidationError;
