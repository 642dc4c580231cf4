//! Tests for server metrics

use langserver_infrastructure::metrics::ServerMetrics;

#[test]
fn test_connection_counters() {
    let metrics = ServerMetrics::new().expect("metrics");

    metrics.connection_opened();
    metrics.connection_opened();
    metrics.connection_closed();

    assert_eq!(metrics.connections_total(), 2);
    assert_eq!(metrics.connections_active(), 1);
}

#[test]
fn test_request_counters_by_method() {
    let metrics = ServerMetrics::new().expect("metrics");

    metrics.request_started("initialize");
    metrics.request_started("shutdown");
    metrics.request_started("shutdown");
    metrics.request_failed("shutdown");

    assert_eq!(metrics.requests_total(), 3);
    assert_eq!(metrics.requests_for("shutdown"), 2);
    assert_eq!(metrics.requests_for("hover"), 0);
}

#[test]
fn test_text_exposition() {
    let metrics = ServerMetrics::new().expect("metrics");
    metrics.connection_opened();
    metrics.request_started("initialize");
    metrics.request_failed("initialize");

    let text = metrics.encode().expect("encodes");
    assert!(text.contains("langserver_connections_total 1"));
    assert!(text.contains("langserver_connections_active 1"));
    assert!(text.contains("langserver_requests_total{method=\"initialize\"} 1"));
    assert!(text.contains("langserver_request_failures_total{method=\"initialize\"} 1"));
}

#[test]
fn test_instances_have_separate_registries() {
    let first = ServerMetrics::new().expect("metrics");
    let second = ServerMetrics::new().expect("metrics");
    first.connection_opened();
    assert_eq!(second.connections_total(), 0);
}
