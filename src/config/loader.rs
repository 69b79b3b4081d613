//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ForwarderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration from a TOML string without validating it.
pub fn parse_config(content: &str) -> Result<ForwarderConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read a TOML file into a configuration without validating it.
///
/// Callers apply command-line overrides before calling [`validate`].
pub fn read_config(path: &Path) -> Result<ForwarderConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Validate a configuration, wrapping the collected problems.
pub fn validate(config: &ForwarderConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ForwarderConfig, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}
