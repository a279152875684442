//! WebSocket stream actor for the Kalshi API.
//!
//! This module implements the actor pattern for managing the WebSocket connection
//! to Kalshi's streaming API. The actor owns the WebSocket connection and handles
//! all communication in a single async task.

use std::collections::HashMap;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};

use tokio::{
    net::TcpStream,
    sync::{broadcast, mpsc, oneshot},
    time::{interval_at, sleep, sleep_until, timeout},
};

use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream,
    tungstenite::{self, Message, client::IntoClientRequest, http::HeaderValue},
};

use super::{
    BACKOFF_BASE, CONNECT_TIMEOUT, ConnectStrategy, HealthConfig, MAX_BACKOFF,
    channel::Channel,
    command::{ChannelError, ChannelSubscription, StreamCommand, SubscribeResult},
    message::{StreamMessage, StreamUpdate},
    protocol::{self, IncomingMessage},
    request_handler::RequestHandler,
};

use crate::{
    auth::KalshiConfig,
    error::{Error, Result},
};

/// WebSocket stream type alias for clarity.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Collects multiple responses for a single multi-channel subscribe request.
///
/// When subscribing to N channels, Kalshi sends N responses (all with the same
/// request ID but different `sid` values). This collector accumulates those
/// responses until all expected responses are received.
struct SubscribeCollector {
    expected: usize,
    successful: Vec<ChannelSubscription>,
    failed: Vec<ChannelError>,
    sender: oneshot::Sender<std::result::Result<SubscribeResult, String>>,
}

impl SubscribeCollector {
    fn new(
        expected: usize,
        sender: oneshot::Sender<std::result::Result<SubscribeResult, String>>,
    ) -> Self {
        Self {
            expected,
            successful: Vec::with_capacity(expected),
            failed: Vec::new(),
            sender,
        }
    }

    fn add_success(&mut self, channel: String, sid: i64) -> bool {
        self.successful.push(ChannelSubscription { channel, sid });
        self.is_complete()
    }

    fn add_error(&mut self, channel: Option<String>, code: String, message: String) -> bool {
        self.failed.push(ChannelError {
            channel,
            code,
            message,
        });
        self.is_complete()
    }

    fn is_complete(&self) -> bool {
        self.successful.len() + self.failed.len() >= self.expected
    }

    fn finish(self) {
        let result = SubscribeResult {
            successful: self.successful,
            failed: self.failed,
        };
        let _ = self.sender.send(Ok(result));
    }
}

/// The WebSocket stream actor that manages the connection lifecycle.
pub struct KalshiStreamSession {
    #[allow(dead_code)]
    config: KalshiConfig,
    cmd_receiver: mpsc::Receiver<StreamCommand>,
    update_sender: broadcast::Sender<StreamUpdate>,
    ws_reader: SplitStream<WsStream>,
    ws_writer: SplitSink<WsStream, Message>,
    request_handler: RequestHandler,
    pending_subscriptions: HashMap<u64, SubscribeCollector>,
    next_subscribe_id: u64,
    health_config: HealthConfig,
    last_pong: Instant,
    ping_pending: bool,
    /// `None` until the first server ping is received (grace period at startup).
    last_server_ping: Option<Instant>,
}

impl KalshiStreamSession {
    /// Connect to the Kalshi WebSocket API with the specified strategy.
    pub async fn connect(
        config: &KalshiConfig,
        strategy: ConnectStrategy,
        cmd_receiver: mpsc::Receiver<StreamCommand>,
        update_sender: broadcast::Sender<StreamUpdate>,
    ) -> Result<Self> {
        Self::connect_with_health(
            config,
            strategy,
            HealthConfig::default(),
            cmd_receiver,
            update_sender,
        )
        .await
    }

    /// Connect with custom health monitoring configuration.
    pub async fn connect_with_health(
        config: &KalshiConfig,
        strategy: ConnectStrategy,
        health_config: HealthConfig,
        cmd_receiver: mpsc::Receiver<StreamCommand>,
        update_sender: broadcast::Sender<StreamUpdate>,
    ) -> Result<Self> {
        let ws_url = config.environment.ws_url();
        let ws_stream = Self::connect_with_strategy(config, ws_url, strategy).await?;

        let (ws_writer, ws_reader) = ws_stream.split();

        Ok(Self {
            config: config.clone(),
            cmd_receiver,
            update_sender,
            ws_reader,
            ws_writer,
            request_handler: RequestHandler::new(),
            pending_subscriptions: HashMap::new(),
            next_subscribe_id: 1,
            health_config,
            last_pong: Instant::now(),
            ping_pending: false,
            last_server_ping: None,
        })
    }

    async fn connect_with_strategy(
        config: &KalshiConfig,
        ws_url: &str,
        strategy: ConnectStrategy,
    ) -> Result<WsStream> {
        match strategy {
            ConnectStrategy::Simple => Self::connect_with_auth(config, ws_url).await,
            ConnectStrategy::Retry => Self::connect_with_retry(config, ws_url).await,
        }
    }

    /// Connect with exponential backoff retry, capped at [`MAX_BACKOFF`].
    async fn connect_with_retry(config: &KalshiConfig, ws_url: &str) -> Result<WsStream> {
        let mut attempt: u32 = 1;

        loop {
            info!("Connection attempt {} to {}", attempt, ws_url);

            match timeout(CONNECT_TIMEOUT, Self::connect_with_auth(config, ws_url)).await {
                Ok(Ok(ws_stream)) => return Ok(ws_stream),
                Ok(Err(e)) => warn!("Connection failed: {}", e),
                Err(_) => warn!("Connection timed out after {:?}", CONNECT_TIMEOUT),
            }

            let backoff = (BACKOFF_BASE * attempt).min(MAX_BACKOFF);
            info!("Retrying in {:?}", backoff);
            sleep(backoff).await;
            attempt += 1;
        }
    }

    /// Establish a WebSocket connection with authentication headers.
    ///
    /// The signature message format is: `{timestamp}GET/trade-api/ws/v2`
    async fn connect_with_auth(config: &KalshiConfig, ws_url: &str) -> Result<WsStream> {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis() as u64;

        let signature = config.sign(timestamp_ms, "GET", "/trade-api/ws/v2")?;

        let mut request = ws_url
            .into_client_request()
            .map_err(|e| Error::WebSocket(Box::new(e)))?;

        let headers = request.headers_mut();
        headers.insert(
            "KALSHI-ACCESS-KEY",
            HeaderValue::from_str(config.api_key_id())
                .map_err(|e| Error::InvalidHeaderValue(e.to_string()))?,
        );
        headers.insert(
            "KALSHI-ACCESS-SIGNATURE",
            HeaderValue::from_str(&signature)
                .map_err(|e| Error::InvalidHeaderValue(e.to_string()))?,
        );
        headers.insert(
            "KALSHI-ACCESS-TIMESTAMP",
            HeaderValue::from_str(&timestamp_ms.to_string())
                .map_err(|e| Error::InvalidHeaderValue(e.to_string()))?,
        );

        info!("Connecting to Kalshi WebSocket at {}", ws_url);

        let (ws_stream, response) = tokio_tungstenite::connect_async(request).await?;

        info!(
            "Connected to Kalshi WebSocket (status: {})",
            response.status()
        );

        Ok(ws_stream)
    }

    /// Run the actor's main event loop until the connection closes or a command
    /// requests shutdown. Broadcasts a [`StreamMessage::Disconnected`] on exit.
    pub async fn run(mut self) {
        info!("KalshiStreamSession starting main loop");

        let ping_start = Instant::now() + self.health_config.ping_interval;
        let mut ping_interval = interval_at(ping_start.into(), self.health_config.ping_interval);

        let (disconnect_reason, was_clean);

        loop {
            tokio::select! {
                Some(command) = self.cmd_receiver.recv() => {
                    if self.handle_command(command).await {
                        info!("KalshiStreamSession received close command, shutting down");
                        disconnect_reason = "Client requested close".to_string();
                        was_clean = true;
                        break;
                    }
                }

                Some(message) = self.ws_reader.next() => {
                    match self.handle_ws_message(message).await {
                        Ok(false) => {}
                        Ok(true) => {
                            disconnect_reason = "Server closed connection".to_string();
                            was_clean = true;
                            break;
                        }
                        Err(reason) => {
                            disconnect_reason = reason;
                            was_clean = false;
                            break;
                        }
                    }
                }

                _ = ping_interval.tick() => {
                    if self.ping_pending {
                        let elapsed = self.last_pong.elapsed();
                        if elapsed > self.health_config.ping_timeout {
                            error!("Ping timeout: no pong received in {:?}", elapsed);
                            disconnect_reason = "Ping timeout".to_string();
                            was_clean = false;
                            break;
                        }
                    } else {
                        let ping_data = b"health".to_vec();
                        if let Err(e) = self.ws_writer.send(Message::Ping(ping_data)).await {
                            error!("Failed to send ping: {}", e);
                            disconnect_reason = format!("Failed to send ping: {}", e);
                            was_clean = false;
                            break;
                        }
                        self.ping_pending = true;
                        debug!("Sent health ping");
                    }
                }

                _ = async {
                    if let Some(last_ping) = self.last_server_ping {
                        sleep_until((last_ping + self.health_config.server_ping_timeout).into()).await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    if let Some(last_ping) = self.last_server_ping {
                        let elapsed = last_ping.elapsed();
                        if elapsed > self.health_config.server_ping_timeout {
                            error!("Server ping timeout: no ping from Kalshi in {:?}", elapsed);
                            disconnect_reason = "Server ping timeout".to_string();
                            was_clean = false;
                            break;
                        }
                    }
                }

                else => {
                    info!("KalshiStreamSession all channels closed, shutting down");
                    disconnect_reason = "All channels closed".to_string();
                    was_clean = true;
                    break;
                }
            }
        }

        let disconnect_update = StreamUpdate {
            channel: "system".to_string(),
            sid: 0,
            seq: None,
            msg: StreamMessage::Disconnected {
                reason: disconnect_reason.clone(),
                was_clean,
            },
        };
        let _ = self.update_sender.send(disconnect_update);
        info!(
            "Broadcast disconnect event: {} (clean: {})",
            disconnect_reason, was_clean
        );

        self.request_handler.cancel_all("connection closed");
        self.pending_subscriptions.clear();
        let _ = self.ws_writer.close().await;
        info!("KalshiStreamSession shutdown complete");
    }

    /// Handle a command from a client handle. Returns `true` if the actor should shut down.
    async fn handle_command(&mut self, command: StreamCommand) -> bool {
        match command {
            StreamCommand::Subscribe {
                channels,
                market_tickers,
                response,
            } => {
                let channels: Vec<Channel> = channels
                    .iter()
                    .filter_map(|s| match s.as_str() {
                        "orderbook_delta" => Some(Channel::OrderbookDelta),
                        "market_positions" => Some(Channel::MarketPositions),
                        "market_lifecycle_v2" => Some(Channel::MarketLifecycle),
                        _ => {
                            warn!("Unknown channel: {}", s);
                            None
                        }
                    })
                    .collect();

                if channels.is_empty() {
                    let _ = response.send(Err("No valid channels specified".to_string()));
                    return false;
                }

                if market_tickers.is_empty() {
                    let channels_requiring_tickers: Vec<&str> = channels
                        .iter()
                        .filter(|c| c.requires_market_ticker())
                        .map(Channel::as_str)
                        .collect();

                    if !channels_requiring_tickers.is_empty() {
                        let _ = response.send(Err(format!(
                            "Market tickers required for channels: {}",
                            channels_requiring_tickers.join(", ")
                        )));
                        return false;
                    }
                }

                let tickers: Vec<&str> = market_tickers.iter().map(String::as_str).collect();
                let num_channels = channels.len();

                let request_id = self.next_subscribe_id;
                self.next_subscribe_id += 1;

                let msg = protocol::build_subscribe(request_id, &channels, &tickers);
                debug!(
                    "Sending subscribe request {} for {} channels: {}",
                    request_id, num_channels, msg
                );

                if let Err(e) = self.ws_writer.send(Message::Text(msg)).await {
                    error!("Failed to send subscribe message: {}", e);
                    let _ = response.send(Err(format!("WebSocket send error: {}", e)));
                    return false;
                }

                let collector = SubscribeCollector::new(num_channels, response);
                self.pending_subscriptions.insert(request_id, collector);
            }

            StreamCommand::Unsubscribe { sids, response } => {
                let request_id = self.next_subscribe_id;
                self.next_subscribe_id += 1;

                let (tx, rx) = oneshot::channel();
                self.request_handler.register_with_id(request_id, tx);

                let msg = protocol::build_unsubscribe(request_id, &sids);
                debug!("Sending unsubscribe request {}: {}", request_id, msg);

                if let Err(e) = self.ws_writer.send(Message::Text(msg)).await {
                    error!("Failed to send unsubscribe message: {}", e);
                    self.request_handler
                        .handle_response(request_id, Err(format!("WebSocket send error: {}", e)));
                    let _ = response.send(Err(format!("WebSocket send error: {}", e)));
                    return false;
                }

                tokio::spawn(async move {
                    match rx.await {
                        Ok(Ok(json)) => {
                            let _ = response.send(Ok(json));
                        }
                        Ok(Err(reason)) => {
                            let _ = response.send(Err(reason));
                        }
                        Err(_) => {
                            let _ = response.send(Err("Request cancelled".to_string()));
                        }
                    }
                });
            }

            StreamCommand::Close => {
                info!("Received close command");
                return true;
            }
        }

        false
    }

    /// Returns `Ok(false)` to continue, `Ok(true)` for clean shutdown, `Err(reason)` otherwise.
    async fn handle_ws_message(
        &mut self,
        message: std::result::Result<Message, tungstenite::Error>,
    ) -> std::result::Result<bool, String> {
        match message {
            Ok(Message::Text(text)) => {
                self.handle_text_message(&text).await;
                Ok(false)
            }

            Ok(Message::Ping(data)) => {
                debug!("Received ping: {:?}", String::from_utf8_lossy(&data));
                self.last_server_ping = Some(Instant::now());
                if let Err(e) = self.ws_writer.send(Message::Pong(data)).await {
                    error!("Failed to send pong: {}", e);
                    return Err(format!("Failed to send pong: {}", e));
                }
                Ok(false)
            }

            Ok(Message::Pong(data)) => {
                debug!("Received pong: {:?}", String::from_utf8_lossy(&data));
                self.last_pong = Instant::now();
                self.ping_pending = false;
                Ok(false)
            }

            Ok(Message::Close(frame)) => {
                info!("Received close frame: {:?}", frame);
                Ok(true)
            }

            Ok(Message::Binary(data)) => {
                warn!("Received unexpected binary message: {} bytes", data.len());
                Ok(false)
            }

            Ok(Message::Frame(_)) => Ok(false),

            Err(tungstenite::Error::ConnectionClosed) => {
                info!("WebSocket connection closed");
                Ok(true)
            }

            Err(tungstenite::Error::AlreadyClosed) => {
                info!("WebSocket already closed");
                Ok(true)
            }

            Err(tungstenite::Error::Io(ref e)) => {
                error!("WebSocket I/O error: {}", e);
                Err(format!("I/O error: {}", e))
            }

            Err(e) => {
                error!("WebSocket error: {}", e);
                Err(format!("WebSocket error: {}", e))
            }
        }
    }

    async fn handle_text_message(&mut self, text: &str) {
        debug!("Received message: {}", text);

        match protocol::parse_incoming(text) {
            Ok(IncomingMessage::Response { id, msg_type, msg }) => {
                debug!("Response for request {}: type={}", id, msg_type);

                if msg_type == "subscribed" {
                    if let Some(collector) = self.pending_subscriptions.get_mut(&id) {
                        let channel = msg
                            .get("channel")
                            .and_then(|c| c.as_str())
                            .unwrap_or("unknown")
                            .to_string();
                        let sid = msg.get("sid").and_then(|s| s.as_i64()).unwrap_or(-1);

                        debug!(
                            "Subscribe response for request {}: channel={}, sid={}",
                            id, channel, sid
                        );

                        let is_complete = collector.add_success(channel, sid);
                        if is_complete {
                            if let Some(collector) = self.pending_subscriptions.remove(&id) {
                                collector.finish();
                            }
                        }
                        return;
                    }
                }

                if msg_type == "unsubscribed"
                    && let Some(sid) = msg.get("sid").and_then(|s| s.as_i64())
                {
                    let update = StreamUpdate {
                        channel: msg_type.clone(),
                        sid,
                        seq: None,
                        msg: StreamMessage::Unsubscribed,
                    };
                    if let Err(e) = self.update_sender.send(update) {
                        debug!("No update receivers for unsubscribed event: {}", e);
                    }
                }

                let full_response = serde_json::json!({ "type": msg_type, "msg": msg });
                self.request_handler.handle_response(id, Ok(full_response));
            }

            Ok(IncomingMessage::Update { msg_type, sid, msg }) => {
                debug!("Update on sid {}: type={}", sid, msg_type);

                if msg_type == "unsubscribed" {
                    let update = StreamUpdate {
                        channel: msg_type,
                        sid,
                        seq: None,
                        msg: StreamMessage::Unsubscribed,
                    };
                    if let Err(e) = self.update_sender.send(update) {
                        debug!("No update receivers for unsubscribed event: {}", e);
                    }
                    return;
                }

                match serde_json::from_value::<StreamMessage>(msg) {
                    Ok(parsed) => {
                        let update = StreamUpdate {
                            channel: msg_type,
                            sid,
                            seq: None,
                            msg: parsed,
                        };
                        if let Err(e) = self.update_sender.send(update) {
                            debug!("No update receivers: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse update: {}", e);
                    }
                }
            }

            Ok(IncomingMessage::Error { id, code, message }) => {
                error!("Error response: code={}, message={}", code, message);

                if let Some(request_id) = id {
                    if let Some(collector) = self.pending_subscriptions.get_mut(&request_id) {
                        debug!(
                            "Subscribe error for request {}: code={}, message={}",
                            request_id, code, message
                        );

                        let is_complete = collector.add_error(None, code, message.clone());
                        if is_complete {
                            if let Some(collector) = self.pending_subscriptions.remove(&request_id)
                            {
                                collector.finish();
                            }
                        }
                        return;
                    }

                    self.request_handler
                        .handle_response(request_id, Err(format!("{}: {}", code, message)));
                }
            }

            Err(e) => {
                error!("Failed to parse incoming message: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for KalshiStreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiStreamSession")
            .field("pending_requests", &self.request_handler.pending_count())
            .field("pending_subscriptions", &self.pending_subscriptions.len())
            .field("ping_pending", &self.ping_pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;

    /// Extract subscription IDs from a subscribe response.
    fn extract_sids(response: &JsonValue) -> Vec<i64> {
        if let Some(sid) = response
            .get("msg")
            .and_then(|msg| msg.get("sid"))
            .and_then(|s| s.as_i64())
        {
            return vec![sid];
        }

        response
            .get("msg")
            .and_then(|msg| msg.get("sids"))
            .and_then(|sids| sids.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_extract_sids_singular() {
        let response = serde_json::json!({
            "type": "subscribed",
            "msg": { "channel": "orderbook_delta", "sid": 42 }
        });
        assert_eq!(extract_sids(&response), vec![42]);
    }

    #[test]
    fn test_extract_sids_array_fallback() {
        let response = serde_json::json!({
            "type": "subscribed",
            "msg": { "sids": [42, 43, 44] }
        });
        assert_eq!(extract_sids(&response), vec![42, 43, 44]);
    }

    #[test]
    fn test_extract_sids_empty() {
        let response = serde_json::json!({ "type": "subscribed", "msg": {} });
        assert!(extract_sids(&response).is_empty());
    }

    #[test]
    fn test_extract_sids_missing_msg() {
        let response = serde_json::json!({ "type": "error" });
        assert!(extract_sids(&response).is_empty());
    }
}
