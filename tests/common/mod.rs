//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use api_forwarder::{ForwarderConfig, HttpServer, Shutdown};

/// A request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// Serve a router on an ephemeral localhost port.
pub async fn spawn_app(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn record(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let reply = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "body_len": body.len(),
    });
    recorder.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    (StatusCode::OK, [("x-upstream", "recorder")], Json(reply)).into_response()
}

/// Upstream that answers every request with 200 and remembers it.
pub async fn start_recording_upstream() -> (SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new().fallback(record).with_state(recorder.clone());
    (spawn_app(router).await, recorder)
}

/// A forwarder running in the background.
pub struct TestForwarder {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestForwarder {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a forwarder pointed at `upstream_url`, adjusting the config first.
pub async fn start_forwarder_with<F>(upstream_url: String, tweak: F) -> TestForwarder
where
    F: FnOnce(&mut ForwarderConfig),
{
    let mut config = ForwarderConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.url = upstream_url;
    tweak(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestForwarder {
        addr,
        shutdown,
        handle,
    }
}

pub async fn start_forwarder(upstream: SocketAddr) -> TestForwarder {
    start_forwarder_with(format!("http://{}", upstream), |_| {}).await
}

/// Test client that talks to localhost directly.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
