//! WebSocket streaming client for Kalshi's real-time API.
//!
//! [`KalshiStreamClient`] owns the connection and the actor task that drives it.
//! [`KalshiStreamHandle`] is a cheap, cloneable handle for sending commands and
//! receiving the broadcast stream of updates. BookFeed subscribes to a fixed set
//! of channels and market tickers once per connection and resubscribes wholesale
//! after every reconnect, so this client does not track per-market subscription
//! state the way Kalshi's richer incremental add/remove-market API would allow.

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};

use super::{ConnectStrategy, HealthConfig, channel::Channel, command::StreamCommand,
    message::StreamUpdate, session::KalshiStreamSession};

use crate::{
    auth::KalshiConfig,
    error::{Error, Result},
};

/// Default buffer size for the broadcast channel.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Owner of the WebSocket connection and its actor task.
///
/// Dropping this shuts down the actor task (the `mpsc` sender is dropped, which
/// ends the actor's command stream and the `run()` loop exits). Use
/// [`handle()`](Self::handle) to get a cloneable handle for interacting with
/// the stream from elsewhere.
///
/// # Example
///
/// ```no_run
/// use kalshi_trade_rs::auth::KalshiConfig;
/// use kalshi_trade_rs::ws::{Channel, ConnectStrategy, KalshiStreamClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = KalshiConfig::from_env()?;
/// let client = KalshiStreamClient::connect_with_strategy(&config, ConnectStrategy::Retry).await?;
///
/// let mut handle = client.handle();
/// handle.subscribe(&[Channel::OrderbookDelta], &["INXD-25JAN17-B5955"]).await?;
///
/// while let Ok(update) = handle.update_receiver.recv().await {
///     println!("update: {:?}", update);
/// }
/// # Ok(())
/// # }
/// ```
pub struct KalshiStreamClient {
    actor_handle: JoinHandle<()>,
    cmd_sender: mpsc::Sender<StreamCommand>,
    update_sender: broadcast::Sender<StreamUpdate>,
}

impl KalshiStreamClient {
    /// Connect with the default (Simple) strategy: fails fast on connection errors.
    pub async fn connect(config: &KalshiConfig) -> Result<Self> {
        Self::connect_with_options(config, ConnectStrategy::Simple, DEFAULT_BUFFER_SIZE).await
    }

    /// Connect with a specific connection strategy.
    pub async fn connect_with_strategy(
        config: &KalshiConfig,
        strategy: ConnectStrategy,
    ) -> Result<Self> {
        Self::connect_with_options(config, strategy, DEFAULT_BUFFER_SIZE).await
    }

    /// Connect with full customization of strategy and broadcast buffer size.
    pub async fn connect_with_options(
        config: &KalshiConfig,
        strategy: ConnectStrategy,
        buffer_size: usize,
    ) -> Result<Self> {
        Self::connect_with_health(config, strategy, HealthConfig::default(), buffer_size).await
    }

    /// Connect with custom health-monitoring configuration (ping/pong cadence).
    pub async fn connect_with_health(
        config: &KalshiConfig,
        strategy: ConnectStrategy,
        health_config: HealthConfig,
        buffer_size: usize,
    ) -> Result<Self> {
        let (cmd_sender, cmd_receiver) = mpsc::channel(32);
        let (update_sender, _) = broadcast::channel(buffer_size);

        let session = KalshiStreamSession::connect_with_health(
            config,
            strategy,
            health_config,
            cmd_receiver,
            update_sender.clone(),
        )
        .await?;

        let actor_handle = tokio::spawn(session.run());

        Ok(Self {
            actor_handle,
            cmd_sender,
            update_sender,
        })
    }

    /// Returns a new, cloneable handle for sending commands and receiving updates.
    pub fn handle(&self) -> KalshiStreamHandle {
        KalshiStreamHandle {
            cmd_sender: self.cmd_sender.clone(),
            update_receiver: self.update_sender.subscribe(),
        }
    }

    /// Gracefully close the connection and wait for the actor task to exit.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.cmd_sender.send(StreamCommand::Close).await;
        self.actor_handle
            .await
            .map_err(|e| Error::WebSocket(Box::new(e)))?;
        Ok(())
    }
}

/// A cloneable handle to a running [`KalshiStreamClient`].
///
/// Cloning duplicates the command sender and creates a fresh broadcast
/// subscription (it will not see messages sent before the clone).
#[derive(Clone)]
pub struct KalshiStreamHandle {
    cmd_sender: mpsc::Sender<StreamCommand>,
    /// Receiver for the broadcast stream of parsed updates and connection events.
    pub update_receiver: broadcast::Receiver<StreamUpdate>,
}

impl KalshiStreamHandle {
    /// Subscribe to the given channels for the given market tickers.
    ///
    /// Kalshi processes each channel independently and may subscribe some
    /// successfully while rejecting others; see [`super::SubscribeResult`].
    pub async fn subscribe(
        &mut self,
        channels: &[Channel],
        market_tickers: &[&str],
    ) -> Result<super::SubscribeResult> {
        let (tx, rx) = oneshot::channel();
        self.cmd_sender
            .send(StreamCommand::Subscribe {
                channels: channels.iter().map(|c| c.as_str().to_string()).collect(),
                market_tickers: market_tickers.iter().map(|s| s.to_string()).collect(),
                response: tx,
            })
            .await
            .map_err(|_| Error::WebSocket(Box::new(std::io::Error::other("actor stopped"))))?;

        rx.await
            .map_err(|_| Error::WebSocket(Box::new(std::io::Error::other("actor stopped"))))?
            .map_err(Error::Auth)
    }

    /// Unsubscribe from the given subscription IDs.
    pub async fn unsubscribe(&mut self, sids: &[i64]) -> Result<serde_json::Value> {
        let (tx, rx) = oneshot::channel();
        self.cmd_sender
            .send(StreamCommand::Unsubscribe {
                sids: sids.to_vec(),
                response: tx,
            })
            .await
            .map_err(|_| Error::WebSocket(Box::new(std::io::Error::other("actor stopped"))))?;

        rx.await
            .map_err(|_| Error::WebSocket(Box::new(std::io::Error::other("actor stopped"))))?
            .map_err(Error::Auth)
    }

    /// Request the actor to close the connection.
    pub async fn close(&self) -> Result<()> {
        self.cmd_sender
            .send(StreamCommand::Close)
            .await
            .map_err(|_| Error::WebSocket(Box::new(std::io::Error::other("actor stopped"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<KalshiStreamHandle>();
    }
}
