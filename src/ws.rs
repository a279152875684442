//! BookFeed: the authenticated WebSocket client for Kalshi's streaming API.
//!
//! This module implements the actor pattern for managing the WebSocket connection:
//! a single task owns the socket (split into reader/writer), processes commands from
//! cloneable [`KalshiStreamHandle`]s, and broadcasts parsed updates to subscribers.
//!
//! # Example
//!
//! ```no_run
//! use kalshi_trade_rs::auth::KalshiConfig;
//! use kalshi_trade_rs::ws::{Channel, ConnectStrategy, KalshiStreamClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = KalshiConfig::from_env()?;
//! let client = KalshiStreamClient::connect_with_strategy(
//!     &config,
//!     ConnectStrategy::Retry,
//! ).await?;
//!
//! let mut handle = client.handle();
//! handle.subscribe(&[Channel::OrderbookDelta], &["INXD-25JAN17-B5955"]).await?;
//!
//! while let Ok(update) = handle.update_receiver.recv().await {
//!     println!("update: {:?}", update);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

mod channel;
mod client;
mod command;
mod feed;
mod message;
mod protocol;
mod request_handler;
mod session;

pub use channel::Channel;
pub use client::{KalshiStreamClient, KalshiStreamHandle};
pub use command::SubscribeResult;
pub use feed::BookFeed;
pub use message::{
    MarketLifecycleData, MarketLifecycleEventType, MarketPositionData, OrderbookDeltaData,
    OrderbookSnapshotData, PriceLevel, StreamMessage, StreamUpdate,
};

/// Connection strategy for the WebSocket client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectStrategy {
    /// Single connection attempt. Fast-fail on error.
    #[default]
    Simple,
    /// Retry with exponential backoff, capped at 60 seconds.
    Retry,
}

/// Configuration for connection health monitoring.
///
/// Kalshi sends Ping frames every 10 seconds with body "heartbeat"; tokio-tungstenite
/// answers with Pong automatically. This struct additionally controls *client-initiated*
/// pings (a backup health check) and the grace period for detecting a stalled server.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Interval between client-initiated WebSocket ping frames.
    pub ping_interval: Duration,
    /// Timeout for a pong response before considering the connection dead.
    pub ping_timeout: Duration,
    /// Maximum time to go without a server-initiated ping before reconnecting.
    pub server_ping_timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(30),
            ping_timeout: Duration::from_secs(10),
            server_ping_timeout: Duration::from_secs(30),
        }
    }
}

/// Connection timeout for initial connection attempts.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Base backoff duration, multiplied by attempt number.
pub(crate) const BACKOFF_BASE: Duration = Duration::from_millis(1000);

/// Maximum backoff duration.
pub(crate) const MAX_BACKOFF: Duration = Duration::from_secs(60);
