//! Configuration validation.
//!
//! Serde handles the syntactic side; this module checks values that parse
//! but cannot work: unparsable addresses, upstream URLs without a host,
//! zero timeouts, unknown log levels. Every problem is reported, not just
//! the first.

use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ForwarderConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.url `{url}` is invalid: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.log_level `{0}` is not a tracing level")]
    LogLevel(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(reason) = check_upstream_url(&config.upstream.url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason,
        });
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    // An unparsable level would silently drop our filter directive.
    if tracing::Level::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    // Inbound query strings are forwarded as-is; a base query would be lost.
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ForwarderConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ForwarderConfig::default();
        config.listener.bind_address = "not-an-addr".into();
        config.upstream.url = "ftp://example.com".into();
        config.upstream.timeout_secs = 0;
        config.limits.max_body_bytes = 0;
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], ValidationError::BindAddress("not-an-addr".into()));
        assert!(matches!(errors[1], ValidationError::UpstreamUrl { .. }));
        assert_eq!(errors[2], ValidationError::ZeroTimeout);
        assert_eq!(errors[3], ValidationError::ZeroBodyLimit);
        assert_eq!(errors[4], ValidationError::LogLevel("verbose".into()));
    }

    #[test]
    fn log_levels_accept_any_case() {
        let mut config = ForwarderConfig::default();
        for level in ["trace", "DEBUG", "Info", "warn", "error"] {
            config.observability.log_level = level.into();
            assert!(validate_config(&config).is_ok(), "{} rejected", level);
        }

        config.observability.log_level = "verbose".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::LogLevel("verbose".into())])
        );
    }

    #[test]
    fn upstream_with_query_is_rejected() {
        let mut config = ForwarderConfig::default();
        config.upstream.url = "http://127.0.0.1:3000/?a=1".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("query"));
    }

    #[test]
    fn upstream_with_path_prefix_is_accepted() {
        let mut config = ForwarderConfig::default();
        config.upstream.url = "https://internal.example/next".into();
        assert!(validate_config(&config).is_ok());
    }
}
