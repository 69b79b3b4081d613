//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the forwarding handler on every path
//! - Restrict methods to the forwarded set (others get 405)
//! - Wire up middleware (tracing, body limit)
//! - Forward each request to the upstream exactly once
//! - Serve until the shutdown signal fires

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ForwarderConfig;
use crate::http::request::{build_upstream_headers, request_id};
use crate::http::response::into_client_response;
use crate::upstream::{ForwardError, UpstreamClient, UpstreamTarget};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream url: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub target: Arc<UpstreamTarget>,
    pub client: UpstreamClient,
}

/// HTTP server for the forwarder.
pub struct HttpServer {
    router: Router,
    config: ForwarderConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ForwarderConfig) -> Result<Self, ServerError> {
        let target = Arc::new(UpstreamTarget::parse(&config.upstream.url)?);
        let client = UpstreamClient::new(Duration::from_secs(config.upstream.timeout_secs))?;

        let state = AppState { target, client };
        let router = Self::build_router(&config, state);

        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ForwarderConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", forwarded_methods())
            .route("/", forwarded_methods())
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(DefaultBodyLimit::max(config.limits.max_body_bytes)),
            )
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight exchanges are allowed to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// GET (which also answers HEAD), POST, PUT, DELETE, PATCH and OPTIONS.
fn forwarded_methods() -> MethodRouter<AppState> {
    get(forward_handler)
        .post(forward_handler)
        .put(forward_handler)
        .delete(forward_handler)
        .patch(forward_handler)
        .options(forward_handler)
}

/// Relay one request to the upstream and mirror its response.
async fn forward_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %uri.path(),
                reason = %rejection,
                "Inbound body rejected"
            );
            return ForwardError::from(rejection).into_response();
        }
    };

    let url = state.target.url_for(&uri);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        upstream_url = %url,
        body_bytes = body.len(),
        "Forwarding request"
    );

    let outbound_headers = build_upstream_headers(&headers);
    match state.client.send(method.clone(), url, outbound_headers, body).await {
        Ok(upstream) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %uri.path(),
                status = upstream.status.as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            into_client_response(upstream)
        }
        Err(err) => {
            match &err {
                ForwardError::ConnectFailed(_) => tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %uri.path(),
                    error = %err,
                    "Upstream not ready"
                ),
                _ => tracing::error!(
                    request_id = %request_id,
                    method = %method,
                    path = %uri.path(),
                    kind = err.kind(),
                    error = %err,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Upstream error"
                ),
            }
            err.into_response()
        }
    }
}
