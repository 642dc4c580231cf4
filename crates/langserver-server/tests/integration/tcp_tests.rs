//! TCP transport over real sockets

use std::sync::Arc;

use langserver_domain::value_objects::{Framing, RequestId};
use langserver_server::transport::{bind_listener, serve_tcp};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::test_utils::mock_handlers::GatedHandler;
use crate::test_utils::test_fixtures::{
    WIRE_TIMEOUT, baseline_context, context_with, header_frame, next_response, request_body,
    response_reader,
};

#[tokio::test]
async fn test_broken_connection_does_not_stop_accepting() {
    let listener = bind_listener("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().unwrap();
    let ctx = baseline_context(Framing::Header);
    let metrics = Arc::clone(ctx.metrics());
    let server = tokio::spawn(serve_tcp(listener, ctx));

    let mut broken = TcpStream::connect(address).await.unwrap();
    broken
        .write_all(b"Content-Length: nope\r\n\r\n{}")
        .await
        .unwrap();
    let mut rest = Vec::new();
    tokio::time::timeout(WIRE_TIMEOUT, broken.read_to_end(&mut rest))
        .await
        .expect("server closes the broken connection")
        .ok();

    let mut good = TcpStream::connect(address).await.unwrap();
    good.write_all(&header_frame(&request_body(1, "initialize")))
        .await
        .unwrap();
    let mut reader = response_reader(&mut good, Framing::Header);
    let response = next_response(&mut reader).await;
    assert_eq!(response.id, Some(RequestId::Number(1)));
    assert!(response.result.is_some());

    assert!(!server.is_finished());
    assert_eq!(metrics.connections_total(), 2);
    server.abort();
}

#[tokio::test]
async fn test_connections_are_served_concurrently() {
    let listener = bind_listener("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_tcp(
        listener,
        context_with(Arc::new(GatedHandler::default()), Framing::Header),
    ));

    // The first client parks on the gate; only the second client can open it.
    let mut blocked = TcpStream::connect(address).await.unwrap();
    blocked
        .write_all(&header_frame(&request_body(1, "block")))
        .await
        .unwrap();

    let mut opener = TcpStream::connect(address).await.unwrap();
    opener
        .write_all(&header_frame(&request_body(2, "release")))
        .await
        .unwrap();
    let mut opener_reader = response_reader(&mut opener, Framing::Header);
    assert_eq!(
        next_response(&mut opener_reader).await.id,
        Some(RequestId::Number(2))
    );

    let mut blocked_reader = response_reader(&mut blocked, Framing::Header);
    assert_eq!(
        next_response(&mut blocked_reader).await.id,
        Some(RequestId::Number(1))
    );
    server.abort();
}

#[tokio::test]
async fn test_bind_conflict_reports_address() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = taken.local_addr().unwrap().to_string();

    let err = bind_listener(&address).await.expect_err("address in use");
    assert!(err.to_string().contains(&address), "{err}");
}

#[tokio::test]
async fn test_port_only_address_listens_on_all_interfaces() {
    let listener = bind_listener(":0").await.expect("bind");
    assert!(listener.local_addr().unwrap().ip().is_unspecified());
}
