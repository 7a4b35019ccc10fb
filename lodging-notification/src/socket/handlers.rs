use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::{mpsc, Notify};

use crate::socket::registry::{LiveConnection, LiveRegistry, SendError};
use crate::AppState;

/// Frames a socket may have queued before further sends fail.
const OUTBOUND_CAPACITY: usize = 64;

/// Longest a single frame write may take before the socket is dropped.
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Push connection backed by the outbound queue of one WebSocket.
///
/// Sends never wait on the socket. A full queue or a dropped receiver fails
/// the send, which gets the connection pruned from the registry.
struct WsConnection {
    tx: mpsc::Sender<Message>,
    closed: Arc<Notify>,
}

impl WsConnection {
    fn channel() -> (Self, mpsc::Receiver<Message>, Arc<Notify>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let closed = Arc::new(Notify::new());
        let conn = Self {
            tx,
            closed: closed.clone(),
        };
        (conn, rx, closed)
    }
}

impl LiveConnection for WsConnection {
    fn send(&self, payload: &str) -> Result<(), SendError> {
        self.tx
            .try_send(Message::Text(payload.to_string()))
            .map_err(|_| SendError)
    }

    // Signalled out of band so a full queue cannot swallow it.
    fn close(&self) {
        self.closed.notify_one();
    }
}

/// GET /ws
/// Upgrade to a WebSocket that receives every live notification.
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let live = state.live.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, live))
}

async fn handle_socket(mut socket: WebSocket, live: Arc<LiveRegistry>) {
    let (conn, mut rx, closed) = WsConnection::channel();
    let conn_id = live.register(Arc::new(conn));

    tracing::info!(conn_id = %conn_id, "live socket connected");

    loop {
        tokio::select! {
            _ = closed.notified() => {
                let _ = tokio::time::timeout(WRITE_TIMEOUT, socket.send(Message::Close(None))).await;
                break;
            }
            outbound = rx.recv() => match outbound {
                Some(msg) => match tokio::time::timeout(WRITE_TIMEOUT, socket.send(msg)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::debug!(conn_id = %conn_id, error = %e, "live socket send error");
                        break;
                    }
                    Err(_) => {
                        tracing::warn!(conn_id = %conn_id, "live socket write timed out");
                        break;
                    }
                },
                None => break,
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "live socket receive error");
                    break;
                }
            },
        }
    }

    live.unregister(conn_id);
    tracing::info!(conn_id = %conn_id, "live socket disconnected");
}
