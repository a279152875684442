//! Local subscriber gateway: accepts WebSocket clients and forwards every bus
//! message to them as a JSON text frame until the socket errs or goes idle.

use std::time::Duration;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use tracing::{info, warn};

use crate::ws::BookFeed;

use super::{Bus, BusMessage};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

#[derive(Clone)]
pub struct GatewayState {
    bus: Bus,
    book_feed: BookFeed,
}

impl GatewayState {
    pub fn new(bus: Bus, book_feed: BookFeed) -> Self {
        Self { bus, book_feed }
    }
}

/// Bind and serve the `/ws` gateway until `shutdown` fires.
///
/// Each connection subscribes a fresh `broadcast::Receiver` and forwards
/// messages independently; a slow or dead client only affects its own socket
/// (§4.6 — no mid-iteration mutation of a shared subscriber set is needed
/// since axum already gives each connection its own task).
pub async fn run_gateway(
    addr: &str,
    state: GatewayState,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> crate::error::Result<()> {
    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| crate::error::Error::Config(format!("failed to bind {addr}: {e}")))?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await
        .map_err(|e| crate::error::Error::Config(format!("gateway server error: {e}")))
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: GatewayState) {
    if let Err(e) = state.book_feed.resubscribe().await {
        warn!("resubscribe on new gateway connection failed: {e}");
    }

    let mut rx = state.bus.subscribe();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("gateway subscriber lagged, skipped {skipped} messages");
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };
                if send_message(&mut socket, &msg).await.is_err() {
                    break;
                }
            }
            _ = heartbeat.tick() => {
                if send_message(&mut socket, &BusMessage::Heartbeat).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                // Incoming messages from subscribers are ignored (§4.6); only
                // watch for the socket closing.
                if incoming.is_none() {
                    break;
                }
            }
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &BusMessage) -> Result<(), axum::Error> {
    let text = serde_json::to_string(msg).unwrap_or_else(|_| "{}".to_string());
    socket.send(Message::Text(text)).await
}
