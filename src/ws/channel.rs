//! WebSocket channel definitions for the Kalshi streaming API.

use serde::{Deserialize, Serialize};

/// WebSocket channels used by BookFeed.
///
/// Kalshi's streaming API exposes more channels than this (`ticker`, `trade`, `fill`,
/// `communications`, `multivariate`); BookFeed only ever subscribes to these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Real-time orderbook price level changes (delta updates).
    OrderbookDelta,
    /// Real-time portfolio position updates (requires authentication).
    MarketPositions,
    /// Market state changes and event lifecycle.
    #[serde(rename = "market_lifecycle_v2")]
    MarketLifecycle,
}

impl Channel {
    /// Returns true if this channel requires at least one market ticker.
    pub fn requires_market_ticker(&self) -> bool {
        matches!(self, Self::OrderbookDelta | Self::MarketLifecycle)
    }

    /// Returns the wire format name for this channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderbookDelta => "orderbook_delta",
            Self::MarketPositions => "market_positions",
            Self::MarketLifecycle => "market_lifecycle_v2",
        }
    }
}
