//! Tests for connection serving over in-memory streams

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use langserver_domain::constants::{
    JSONRPC_INTERNAL_ERROR, JSONRPC_INVALID_REQUEST, JSONRPC_METHOD_NOT_FOUND, JSONRPC_PARSE_ERROR,
};
use langserver_domain::value_objects::{ConnectionState, Framing, RequestId};
use langserver_server::Connection;
use langserver_server::connection::next_connection_id;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

use crate::test_utils::mock_handlers::{GatedHandler, PanickingHandler, SlowHandler};
use crate::test_utils::test_fixtures::{
    WIRE_TIMEOUT, baseline_context, context_with, header_frame, next_response,
    notification_body, request_body, response_reader,
};

#[tokio::test]
async fn test_initialize_round_trip() {
    let (mut client, server) = duplex(64 * 1024);
    let mut connection = Connection::spawn(next_connection_id(), server, baseline_context(Framing::Header));

    client
        .write_all(&header_frame(&request_body(1, "initialize")))
        .await
        .unwrap();
    let mut reader = response_reader(&mut client, Framing::Header);
    let response = next_response(&mut reader).await;

    assert_eq!(response.id, Some(RequestId::Number(1)));
    let result = response.result.expect("success");
    assert_eq!(result["serverInfo"]["name"], "langserver");
    assert_eq!(result["capabilities"], json!({}));
    assert_eq!(connection.state(), ConnectionState::Serving);

    drop(reader);
    drop(client);
    let outcome = connection.disconnected().await;
    assert!(!outcome.is_error());
}

#[tokio::test]
async fn test_malformed_payloads_keep_the_connection_serving() {
    let (mut client, server) = duplex(64 * 1024);
    let _connection = Connection::spawn(next_connection_id(), server, baseline_context(Framing::Header));

    client.write_all(&header_frame("{oops")).await.unwrap();
    client.write_all(&header_frame(r#"{"jsonrpc":"2.0","id":4}"#)).await.unwrap();
    client
        .write_all(&header_frame(&request_body(5, "shutdown")))
        .await
        .unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let parse = next_response(&mut reader).await;
    assert_eq!(parse.id, None);
    assert_eq!(parse.error.expect("error").code, JSONRPC_PARSE_ERROR);

    let invalid = next_response(&mut reader).await;
    assert_eq!(invalid.error.expect("error").code, JSONRPC_INVALID_REQUEST);

    let shutdown = next_response(&mut reader).await;
    assert_eq!(shutdown.id, Some(RequestId::Number(5)));
    assert_eq!(shutdown.result, Some(json!(null)));
}

#[tokio::test]
async fn test_notifications_and_inbound_responses_get_no_reply() {
    let (mut client, server) = duplex(64 * 1024);
    let _connection = Connection::spawn(next_connection_id(), server, baseline_context(Framing::Header));

    client.write_all(&header_frame(&notification_body("initialized"))).await.unwrap();
    client.write_all(&header_frame(&notification_body("no/such/notification"))).await.unwrap();
    client
        .write_all(&header_frame(r#"{"jsonrpc":"2.0","id":99,"result":{}}"#))
        .await
        .unwrap();
    client.write_all(&header_frame(&request_body(2, "shutdown"))).await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let response = next_response(&mut reader).await;
    assert_eq!(response.id, Some(RequestId::Number(2)));
}

#[tokio::test]
async fn test_unknown_method() {
    let (mut client, server) = duplex(64 * 1024);
    let _connection = Connection::spawn(next_connection_id(), server, baseline_context(Framing::Header));

    client
        .write_all(&header_frame(&request_body(3, "textDocument/hover")))
        .await
        .unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let error = next_response(&mut reader).await.error.expect("error");
    assert_eq!(error.code, JSONRPC_METHOD_NOT_FOUND);
    assert!(error.message.contains("textDocument/hover"));
}

#[tokio::test]
async fn test_handler_panic_becomes_internal_error() {
    let (mut client, server) = duplex(64 * 1024);
    let ctx = context_with(Arc::new(PanickingHandler), Framing::Header);
    let _connection = Connection::spawn(next_connection_id(), server, ctx);

    client.write_all(&header_frame(&request_body(1, "explode"))).await.unwrap();
    client.write_all(&header_frame(&request_body(2, "echo"))).await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let mut responses = vec![next_response(&mut reader).await, next_response(&mut reader).await];
    responses.sort_by_key(|r| format!("{:?}", r.id));

    assert_eq!(responses[0].id, Some(RequestId::Number(1)));
    assert_eq!(
        responses[0].error.as_ref().expect("error").code,
        JSONRPC_INTERNAL_ERROR
    );
    assert_eq!(responses[1].result, Some(json!({ "method": "echo" })));
}

#[tokio::test]
async fn test_overlapping_requests_are_not_serialized() {
    let (mut client, server) = duplex(64 * 1024);
    let ctx = context_with(Arc::new(GatedHandler::default()), Framing::Header);
    let _connection = Connection::spawn(next_connection_id(), server, ctx);

    // `block` only completes once `release`, sent after it, has been handled.
    client.write_all(&header_frame(&request_body(1, "block"))).await.unwrap();
    client.write_all(&header_frame(&request_body(2, "release"))).await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let first = next_response(&mut reader).await;
    let second = next_response(&mut reader).await;

    let mut ids = vec![first.id, second.id];
    ids.sort_by_key(|id| format!("{id:?}"));
    assert_eq!(
        ids,
        vec![Some(RequestId::Number(1)), Some(RequestId::Number(2))]
    );
}

#[tokio::test]
async fn test_full_response_queue_stops_reading_requests() {
    let (mut client, server) = duplex(64 * 1024);
    let ctx = context_with(Arc::new(GatedHandler::default()), Framing::Header)
        .with_response_capacity(1);
    let metrics = Arc::clone(ctx.metrics());
    let _connection = Connection::spawn(next_connection_id(), server, ctx);

    // `block` holds the only slot, so `release` is never read.
    client.write_all(&header_frame(&request_body(1, "block"))).await.unwrap();
    client.write_all(&header_frame(&request_body(2, "release"))).await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let waited = tokio::time::timeout(Duration::from_millis(300), reader.next()).await;
    assert!(waited.is_err(), "no response expected while the queue is full");
    assert_eq!(metrics.requests_total(), 1);
}

#[tokio::test]
async fn test_second_slot_lets_overlapping_requests_finish() {
    let (mut client, server) = duplex(64 * 1024);
    let ctx = context_with(Arc::new(GatedHandler::default()), Framing::Header)
        .with_response_capacity(2);
    let _connection = Connection::spawn(next_connection_id(), server, ctx);

    client.write_all(&header_frame(&request_body(1, "block"))).await.unwrap();
    client.write_all(&header_frame(&request_body(2, "release"))).await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let first = next_response(&mut reader).await;
    let second = next_response(&mut reader).await;
    assert_eq!(first.id, Some(RequestId::Number(2)));
    assert_eq!(second.id, Some(RequestId::Number(1)));
}

#[tokio::test]
async fn test_clean_eof_finishes_in_flight_requests() {
    let (mut client, server) = duplex(64 * 1024);
    let ctx = context_with(
        Arc::new(SlowHandler(Duration::from_millis(100))),
        Framing::Header,
    );
    let mut connection = Connection::spawn(next_connection_id(), server, ctx);

    client.write_all(&header_frame(&request_body(8, "slow"))).await.unwrap();
    client.shutdown().await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    let response = next_response(&mut reader).await;
    assert_eq!(response.id, Some(RequestId::Number(8)));
    assert_eq!(response.result, Some(json!(true)));

    let outcome = tokio::time::timeout(WIRE_TIMEOUT, connection.disconnected())
        .await
        .expect("disconnect");
    assert_eq!(outcome.state, ConnectionState::ClosedNormally);
    assert_eq!(connection.state(), ConnectionState::ClosedNormally);
}

#[tokio::test]
async fn test_trailing_newline_before_close_is_a_normal_close() {
    let (mut client, server) = duplex(64 * 1024);
    let mut connection = Connection::spawn(next_connection_id(), server, baseline_context(Framing::Header));

    client
        .write_all(&header_frame(&request_body(1, "initialize")))
        .await
        .unwrap();
    client.write_all(b"\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let mut reader = response_reader(&mut client, Framing::Header);
    assert_eq!(next_response(&mut reader).await.id, Some(RequestId::Number(1)));

    let outcome = tokio::time::timeout(WIRE_TIMEOUT, connection.disconnected())
        .await
        .expect("disconnect");
    assert_eq!(outcome, langserver_server::Disconnect::normal());
}

#[tokio::test]
async fn test_broken_frame_closes_on_error_and_signal_repeats() {
    let (mut client, server) = duplex(64 * 1024);
    let mut connection = Connection::spawn(next_connection_id(), server, baseline_context(Framing::Header));

    client
        .write_all(b"Content-Length: many\r\n\r\n{}")
        .await
        .unwrap();

    let first = tokio::time::timeout(WIRE_TIMEOUT, connection.disconnected())
        .await
        .expect("disconnect");
    assert!(first.is_error());
    assert!(first.error.as_deref().unwrap_or_default().contains("Content-Length"));
    assert_eq!(connection.state(), ConnectionState::ClosedOnError);

    let second = tokio::time::timeout(Duration::from_millis(50), connection.disconnected())
        .await
        .expect("second observation returns immediately");
    assert_eq!(first, second);

    // The transport was closed: the client reads end-of-stream.
    let mut rest = Vec::new();
    tokio::time::timeout(WIRE_TIMEOUT, client.read_to_end(&mut rest))
        .await
        .expect("eof")
        .unwrap();
}

#[tokio::test]
async fn test_oversized_frame_is_fatal() {
    let (mut client, server) = duplex(64 * 1024);
    let ctx = baseline_context(Framing::Header).with_max_frame_length(16);
    let mut connection = Connection::spawn(next_connection_id(), server, ctx);

    client
        .write_all(&header_frame(&request_body(1, "initialize")))
        .await
        .unwrap();

    let outcome = tokio::time::timeout(WIRE_TIMEOUT, connection.disconnected())
        .await
        .expect("disconnect");
    assert!(outcome.is_error());
}

#[tokio::test]
async fn test_line_framing() {
    let (mut client, server) = duplex(64 * 1024);
    let metrics_ctx = baseline_context(Framing::Line);
    let metrics = Arc::clone(metrics_ctx.metrics());
    let mut connection = Connection::spawn(next_connection_id(), server, metrics_ctx);

    client
        .write_all(format!("{}\n", request_body(1, "initialize")).as_bytes())
        .await
        .unwrap();

    let mut reader = response_reader(&mut client, Framing::Line);
    let response = next_response(&mut reader).await;
    assert_eq!(response.id, Some(RequestId::Number(1)));
    assert_eq!(metrics.requests_for("initialize"), 1);
    assert_eq!(metrics.connections_active(), 1);

    drop(reader);
    drop(client);
    tokio::time::timeout(WIRE_TIMEOUT, connection.disconnected())
        .await
        .expect("disconnect");
    assert_eq!(metrics.connections_active(), 0);
    assert_eq!(metrics.connections_total(), 1);
}
