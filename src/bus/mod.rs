//! BroadcastBus: the single FIFO fan-out queue every producer publishes onto.
//!
//! [`tokio::sync::broadcast`] is the fan-out primitive. [`Bus`] owns the
//! `Sender` half; producers clone it to publish, and the gateway (and any
//! in-process callback such as the Trader) hold their own `Receiver`.

mod gateway;

pub use gateway::{GatewayState, run_gateway};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default bound on the broadcast queue. Coarse protection against unbounded
/// memory growth if a producer runs far ahead of the slowest subscriber.
const DEFAULT_BUS_CAPACITY: usize = 4096;

/// Tagged union of every message a producer may publish (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BusMessage {
    #[serde(rename = "orderbook")]
    Orderbook {
        ticker: String,
        yes: String,
        no: String,
    },
    #[serde(rename = "SensorPoll")]
    SensorPoll {
        site: String,
        payload: Vec<(String, f64)>,
    },
    #[serde(rename = "ForecastPoll")]
    ForecastPoll {
        site: String,
        payload: Vec<(String, f64)>,
    },
    #[serde(rename = "positionUpdate")]
    PositionUpdate { ticker: String, pos: i64 },
    #[serde(rename = "heartbeat")]
    Heartbeat,
}

impl BusMessage {
    /// Format a top-of-book side as `"P@Q"`, or `"N/A"` if the side is empty.
    pub fn format_side(top: Option<(i64, i64)>) -> String {
        match top {
            Some((price, qty)) => format!("{price}@{qty}"),
            None => "N/A".to_string(),
        }
    }
}

/// Owner of the bus's `Sender` half.
#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<BusMessage>,
}

impl Bus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a message. Returns the number of active receivers, or the
    /// underlying send error if there are none — callers should not treat
    /// "no subscribers" as fatal.
    pub fn publish(&self, message: BusMessage) {
        let _ = self.sender.send(message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.sender.subscribe()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_side_present() {
        assert_eq!(BusMessage::format_side(Some((55, 10))), "55@10");
    }

    #[test]
    fn test_format_side_absent() {
        assert_eq!(BusMessage::format_side(None), "N/A");
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = Bus::new();
        let mut rx = bus.subscribe();
        bus.publish(BusMessage::PositionUpdate {
            ticker: "T1".to_string(),
            pos: 1,
        });
        let received = rx.recv().await.unwrap();
        matches!(received, BusMessage::PositionUpdate { .. });
    }

    #[test]
    fn test_orderbook_message_serializes_with_type_tag() {
        let msg = BusMessage::Orderbook {
            ticker: "T1".to_string(),
            yes: "60@7".to_string(),
            no: "45@10".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"orderbook\""));
    }
}
