//! Change notification stream
//!
//! Every connection first receives a `snapshot` frame, then one `event`
//! frame per roster change. A subscriber that falls behind gets a fresh
//! snapshot instead of the events it missed.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use family_core::RosterEvent;
use family_sync::SyncSnapshot;
use futures_util::{Sink, SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Frame sent to stream subscribers
#[derive(Debug, Serialize)]
#[serde(tag = "op", content = "d", rename_all = "lowercase")]
pub enum StreamFrame {
    Snapshot(SyncSnapshot),
    Event(RosterEvent),
}

impl StreamFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Subscribe to roster changes
///
/// GET /events
pub async fn events_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    // Subscribe before the snapshot so no change falls in between
    let mut events = state.sync().subscribe();
    let (mut ws_sink, mut ws_stream) = socket.split();
    info!("Event stream connected");

    let snapshot = StreamFrame::Snapshot(state.sync().snapshot().await);
    if send_frame(&mut ws_sink, &snapshot).await.is_err() {
        warn!("Failed to send initial snapshot");
        return;
    }

    // Client messages are ignored; the read side only watches for close
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "WebSocket read error");
                    break;
                }
            }
        }
    });

    let sync = state.sync().clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let frame = match events.recv().await {
                Ok(event) => StreamFrame::Event(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream lagged, resending snapshot");
                    StreamFrame::Snapshot(sync.snapshot().await)
                }
                Err(RecvError::Closed) => break,
            };
            if send_frame(&mut ws_sink, &frame).await.is_err() {
                debug!("Failed to send frame, closing stream");
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    }

    info!("Event stream disconnected");
}

async fn send_frame<S>(sink: &mut S, frame: &StreamFrame) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
{
    let json = frame.to_json().map_err(|e| {
        warn!(error = %e, "Failed to serialize frame");
    })?;
    sink.send(Message::Text(json)).await.map_err(|_| ())
}
