//! Tests for the diagnostics endpoint
//!
//! Routes are exercised with Rocket's local client; launch failures with
//! real sockets.

use std::sync::Arc;
use std::time::Duration;

use langserver_infrastructure::metrics::ServerMetrics;
use langserver_infrastructure::profiler::{profiler_rocket, serve_profiler};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;

fn metrics() -> Arc<ServerMetrics> {
    Arc::new(ServerMetrics::new().expect("metrics"))
}

#[rocket::async_test]
async fn test_healthz() {
    let client = Client::tracked(profiler_rocket(metrics()))
        .await
        .expect("valid rocket instance");

    let response = client.get("/healthz").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.as_deref(), Some("ok"));
}

#[rocket::async_test]
async fn test_debug_vars() {
    let metrics = metrics();
    metrics.connection_opened();
    metrics.request_started("initialize");
    let client = Client::tracked(profiler_rocket(Arc::clone(&metrics)))
        .await
        .expect("valid rocket instance");

    let response = client.get("/debug/vars").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let body = response.into_string().await.expect("response body");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["service"], "langserver");
    assert_eq!(json["pid"], std::process::id());
    assert_eq!(json["connections_active"], 1);
    assert_eq!(json["connections_total"], 1);
    assert_eq!(json["requests_total"], 1);
    assert!(json["uptime_seconds"].is_u64());
}

#[rocket::async_test]
async fn test_prometheus_metrics() {
    let metrics = metrics();
    metrics.request_started("shutdown");
    let client = Client::tracked(profiler_rocket(metrics))
        .await
        .expect("valid rocket instance");

    let response = client.get("/metrics").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::Plain));

    let body = response.into_string().await.expect("response body");
    assert!(body.contains("langserver_requests_total{method=\"shutdown\"} 1"));
}

#[tokio::test]
async fn test_busy_port_fails_launch() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = occupied.local_addr().expect("addr").to_string();

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        serve_profiler(&address, metrics()),
    )
    .await
    .expect("launch fails promptly");
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unresolvable_address_fails() {
    let result = serve_profiler("definitely not an address", metrics()).await;
    assert!(result.is_err());
}
