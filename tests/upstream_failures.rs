//! Behaviour when the upstream is missing, slow, or broken.

use axum::{http::StatusCode, routing::get, Router};
use reqwest::{header::CONTENT_TYPE, Method};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

mod common;

const NOT_READY: &str = r#"{"error":"Next.js server not ready"}"#;

#[tokio::test]
async fn unreachable_upstream_always_yields_fixed_503() {
    let forwarder = common::start_forwarder(common::closed_addr()).await;
    let client = common::client();

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ];
    for method in methods {
        for path in ["/", "/api/health", "/api/search?keywords=laptop"] {
            let res = client
                .request(method.clone(), forwarder.url(path))
                .body("{}")
                .send()
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE, "{} {}", method, path);
            assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "application/json");
            assert_eq!(res.text().await.unwrap(), NOT_READY);
        }
    }

    forwarder.shutdown.trigger();
}

#[tokio::test]
async fn upstream_that_comes_up_later_is_used_without_restart() {
    let upstream_addr = common::closed_addr();
    let forwarder = common::start_forwarder(upstream_addr).await;
    let client = common::client();

    let res = client.get(forwarder.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let listener = TcpListener::bind(upstream_addr).await.unwrap();
    let router = Router::new().route("/api/health", get(|| async { r#"{"status":"ok"}"# }));
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    let res = client.get(forwarder.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn slow_upstream_times_out_with_504() {
    let router = Router::new().route(
        "/api/search",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let upstream = common::spawn_app(router).await;
    let forwarder = common::start_forwarder_with(format!("http://{}", upstream), |config| {
        config.upstream.timeout_secs = 1;
    })
    .await;

    let started = Instant::now();
    let res = common::client()
        .get(forwarder.url("/api/search"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(res.text().await.unwrap(), r#"{"error":"Upstream request timed out"}"#);
}

#[tokio::test]
async fn garbled_upstream_reply_is_502() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = socket.write_all(b"definitely not http\r\n\r\n").await;
                let _ = socket.shutdown().await;
            });
        }
    });
    let forwarder = common::start_forwarder(upstream).await;

    let res = common::client()
        .get(forwarder.url("/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"Upstream request failed"}"#);
}

#[tokio::test]
async fn shutdown_stops_the_server() {
    let forwarder = common::start_forwarder(common::closed_addr()).await;

    forwarder.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), forwarder.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn shutdown_lets_in_flight_request_finish() {
    let upstream = common::spawn_app(Router::new().route(
        "/api/search/status",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(800)).await;
            "ready"
        }),
    ))
    .await;
    let forwarder = common::start_forwarder(upstream).await;

    let url = forwarder.url("/api/search/status");
    let in_flight = tokio::spawn(async move { common::client().get(url).send().await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    forwarder.shutdown.trigger();

    let res = in_flight.await.unwrap().unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ready");

    let result = tokio::time::timeout(Duration::from_secs(5), forwarder.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}
