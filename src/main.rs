//! API forwarder.
//!
//! Accepts every request on one port and relays it, unchanged in method,
//! path, query, headers (minus `host`) and body, to a single upstream.
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────┐
//!     ────────────────────┼─▶ axum router ──▶ upstream client ──────┼───▶ Next.js
//!                         │   (any path)      (one attempt, 30s)    │    (127.0.0.1:3000)
//!     Client Response     │                                         │
//!     ◀───────────────────┼── status + body, minus framing headers ◀┼────
//!                         │   503 {"error":"Next.js server not ready"}
//!                         │   when the upstream refuses connections │
//!                         └──────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use api_forwarder::config::{
    loader::{read_config, validate},
    ForwarderConfig,
};
use api_forwarder::observability::init_logging;
use api_forwarder::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "api-forwarder")]
#[command(about = "Relay every HTTP request to a fixed upstream", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstream.url.
    #[arg(short, long)]
    upstream: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ForwarderConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ForwarderConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(upstream) = self.upstream {
            config.upstream.url = upstream;
        }
        validate(&config)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    init_logging(&config.observability);

    tracing::info!("api-forwarder v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        timeout_secs = config.upstream.timeout_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let _signal_task = shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_forwarder::config::loader::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("api-forwarder").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn bind_override_repairs_invalid_file_value() {
        let file = config_file("[listener]\nbind_address = \"not-an-addr\"\n");
        let path = file.path().to_str().unwrap();

        let config = cli(&["--config", path, "--bind", "127.0.0.1:0"])
            .into_config()
            .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:0");
    }

    #[test]
    fn upstream_override_is_validated() {
        let file = config_file("[upstream]\nurl = \"http://127.0.0.1:3000\"\n");
        let path = file.path().to_str().unwrap();

        let err = cli(&["--config", path, "--upstream", "ftp://x"])
            .into_config()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let config = cli(&["--upstream", "http://next.internal:3000"])
            .into_config()
            .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8001");
        assert_eq!(config.upstream.url, "http://next.internal:3000");
    }
}
