//! WebSocket message types for the three channels BookFeed subscribes to.

use serde::{Deserialize, Serialize};

use crate::models::Side;

/// Market lifecycle event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketLifecycleEventType {
    Created,
    Activated,
    Deactivated,
    CloseDateUpdated,
    Determined,
    Settled,
}

/// Wrapper for all WebSocket stream updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamUpdate {
    /// The channel this message belongs to.
    #[serde(rename = "type")]
    pub channel: String,
    /// Server-generated subscription identifier.
    pub sid: i64,
    /// Sequence number for ordering messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<i64>,
    /// The message payload.
    pub msg: StreamMessage,
}

/// Enum representing all possible WebSocket message types BookFeed handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamMessage {
    /// Orderbook snapshot with full state.
    OrderbookSnapshot(OrderbookSnapshotData),
    /// Incremental orderbook update.
    OrderbookDelta(OrderbookDeltaData),
    /// User position update.
    MarketPosition(MarketPositionData),
    /// Market lifecycle event.
    MarketLifecycle(MarketLifecycleData),
    /// Confirmation that a subscription was closed.
    ///
    /// Local event synthesized from an `unsubscribed` server message.
    #[serde(skip)]
    Unsubscribed,
    /// Connection was lost or closed.
    ///
    /// This is a local event, not received from the server.
    #[serde(skip)]
    Disconnected {
        /// Human-readable reason for disconnection.
        reason: String,
        /// Whether this was a clean close (server sent close frame).
        was_clean: bool,
    },
}

/// A price level in the orderbook: [price_cents, contracts].
pub type PriceLevel = [i64; 2];

/// A price level with dollar representation: [price_dollars, contracts].
pub type PriceLevelDollars = (String, i64);

/// Orderbook snapshot data containing the full orderbook state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookSnapshotData {
    /// Market ticker identifier.
    pub market_ticker: String,
    /// Yes side price levels: [price_cents, contracts].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes: Option<Vec<PriceLevel>>,
    /// Yes side price levels in dollars: [price_dollars, contracts].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_dollars: Option<Vec<PriceLevelDollars>>,
    /// No side price levels: [price_cents, contracts].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no: Option<Vec<PriceLevel>>,
    /// No side price levels in dollars: [price_dollars, contracts].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_dollars: Option<Vec<PriceLevelDollars>>,
}

/// Orderbook delta data representing an incremental update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookDeltaData {
    /// Market ticker identifier.
    pub market_ticker: String,
    /// Price level being updated (1-99 cents).
    pub price: i64,
    /// Change in quantity (positive = increase, negative = decrease).
    pub delta: i64,
    /// Side of the orderbook being updated.
    pub side: Side,
    /// Price in dollar format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_dollars: Option<String>,
    /// Client order ID if the subscriber triggered this change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

/// Market position data for user position updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPositionData {
    /// User identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Market ticker identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ticker: Option<String>,
    /// Net position (positive = long, negative = short).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    /// Cost basis in centi-cents (1/10,000th of a dollar).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_cost: Option<i64>,
    /// Realized profit/loss in centi-cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<i64>,
    /// Fees paid in centi-cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_paid: Option<i64>,
    /// Total volume traded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
}

/// Market lifecycle data for market state change events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketLifecycleData {
    /// Type of lifecycle event.
    pub event_type: MarketLifecycleEventType,
    /// Market ticker identifier.
    pub market_ticker: String,
    /// Unix timestamp when market opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ts: Option<i64>,
    /// Unix timestamp for scheduled close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_ts: Option<i64>,
    /// Market determination result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Unix timestamp of determination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determination_ts: Option<i64>,
    /// Unix timestamp of settlement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_ts: Option<i64>,
    /// Whether trading is paused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deactivated: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orderbook_delta_deserialization() {
        let json = r#"{
            "market_ticker": "KXBTC-24DEC31-100000",
            "price": 45,
            "delta": 10,
            "side": "yes"
        }"#;
        let delta: OrderbookDeltaData = serde_json::from_str(json).unwrap();
        assert_eq!(delta.market_ticker, "KXBTC-24DEC31-100000");
        assert_eq!(delta.price, 45);
        assert_eq!(delta.delta, 10);
        assert_eq!(delta.side, Side::Yes);
    }

    #[test]
    fn test_market_lifecycle_event_type() {
        assert_eq!(
            serde_json::to_string(&MarketLifecycleEventType::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(
            serde_json::to_string(&MarketLifecycleEventType::CloseDateUpdated).unwrap(),
            "\"close_date_updated\""
        );
    }
}
