//! Event stream integration tests
//!
//! Run with: cargo test -p integration-tests --test events_tests

use std::time::Duration;

use futures_util::StreamExt;
use integration_tests::{assert_status, TestServer};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

type EventStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_frame(ws: &mut EventStream) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("frame is not JSON");
        }
    }
}

/// Read frames until an event of the given type arrives
async fn wait_for_event(ws: &mut EventStream, event_type: &str) -> Value {
    loop {
        let frame = next_frame(ws).await;
        if frame["op"] == "event" && frame["d"]["type"] == event_type {
            return frame["d"].clone();
        }
    }
}

#[tokio::test]
async fn test_stream_starts_with_snapshot() {
    let server = TestServer::start().await.unwrap();
    let (mut ws, _) = connect_async(server.events_url()).await.unwrap();

    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["op"], "snapshot");
    assert_eq!(frame["d"]["signed_in"], false);
    assert!(frame["d"]["members"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stream_reports_sync_progress() {
    let server = TestServer::start().await.unwrap();
    let (mut ws, _) = connect_async(server.events_url()).await.unwrap();
    next_frame(&mut ws).await;

    let response = server.post_empty("/api/v1/account/check").await.unwrap();
    assert_status(response, StatusCode::ACCEPTED).await.unwrap();

    let status = wait_for_event(&mut ws, "ACCOUNT_STATUS_CHANGED").await;
    assert_eq!(status["signed_in"], true);

    let identity = wait_for_event(&mut ws, "IDENTITY_RESOLVED").await;
    assert_eq!(identity["identity"]["id"], "device1");

    let roster = wait_for_event(&mut ws, "ROSTER_REPLACED").await;
    assert_eq!(roster["members"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stream_reports_optimistic_then_confirmed_member() {
    let server = TestServer::start_with_config(integration_tests::test_config("u7", false))
        .await
        .unwrap();
    let (mut ws, _) = connect_async(server.events_url()).await.unwrap();
    next_frame(&mut ws).await;

    server.post_empty("/api/v1/account/check").await.unwrap();

    let optimistic = wait_for_event(&mut ws, "MEMBER_ADDED").await;
    assert_eq!(optimistic["confirmed"], false);
    assert_eq!(optimistic["member"]["device_id"], "u7");
    assert_eq!(optimistic["member"]["role"], "Owner");

    let confirmed = wait_for_event(&mut ws, "MEMBER_ADDED").await;
    assert_eq!(confirmed["confirmed"], true);
    assert_eq!(confirmed["member"]["id"], server.directory.records()[0].id.as_str());
}
