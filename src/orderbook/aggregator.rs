//! Registry of per-market order book state, driven directly by BookFeed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::Side;
use crate::ws::{OrderbookDeltaData, OrderbookSnapshotData};

use super::state::OrderbookState;

/// Snapshot of a single market's best prices, for callers that don't need the
/// full depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderbookSummary {
    pub best_yes_bid: Option<(i64, i64)>,
    pub best_yes_ask: Option<(i64, i64)>,
    pub spread: Option<i64>,
    pub midpoint: Option<f64>,
}

/// Registry of order book state for every tracked market ticker.
///
/// BookFeed owns one of these and applies every `orderbook_snapshot`/
/// `orderbook_delta` message it receives directly. There is no internal
/// broadcast here; fan-out to local subscribers goes through the bus module.
#[derive(Clone, Default)]
pub struct OrderBookStore {
    state: Arc<RwLock<HashMap<String, OrderbookState>>>,
}

impl OrderBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a market's book with a fresh snapshot.
    pub fn apply_snapshot(&self, snapshot: &OrderbookSnapshotData) {
        let state = OrderbookState::from_snapshot(snapshot);
        self.state
            .write()
            .insert(snapshot.market_ticker.clone(), state);
    }

    /// Apply an incremental delta to an already-snapshotted market.
    ///
    /// Returns `None` without mutating anything if `delta.market_ticker` has
    /// no book yet — a delta can only ever modify state a snapshot created,
    /// never originate it.
    pub fn apply_delta(&self, delta: &OrderbookDeltaData) -> Option<i64> {
        let mut guard = self.state.write();
        let market_state = guard.get_mut(&delta.market_ticker)?;
        Some(market_state.apply_delta(delta))
    }

    /// Drop all tracked markets. Called on reconnect before BookFeed
    /// resubscribes and receives fresh snapshots.
    pub fn clear(&self) {
        self.state.write().clear();
    }

    /// Drop a single market's state.
    pub fn clear_market(&self, ticker: &str) {
        self.state.write().remove(ticker);
    }

    /// Best-price summary for one market.
    pub fn summary(&self, ticker: &str) -> Option<OrderbookSummary> {
        let guard = self.state.read();
        let market_state = guard.get(ticker)?;
        Some(OrderbookSummary {
            best_yes_bid: market_state.best_yes_bid(),
            best_yes_ask: market_state.best_yes_ask(),
            spread: market_state.spread(),
            midpoint: market_state.midpoint(),
        })
    }

    pub fn best_yes_bid(&self, ticker: &str) -> Option<(i64, i64)> {
        self.state.read().get(ticker)?.best_yes_bid()
    }

    pub fn best_yes_ask(&self, ticker: &str) -> Option<(i64, i64)> {
        self.state.read().get(ticker)?.best_yes_ask()
    }

    pub fn depth_at_price(&self, ticker: &str, side: Side, price: i64) -> i64 {
        self.state
            .read()
            .get(ticker)
            .map(|s| s.depth_at_price(side, price))
            .unwrap_or(0)
    }

    /// Tickers currently tracked (have received at least one snapshot or delta).
    pub fn tracked_markets(&self) -> Vec<String> {
        self.state.read().keys().cloned().collect()
    }

    pub fn is_initialized(&self, ticker: &str) -> bool {
        self.state
            .read()
            .get(ticker)
            .is_some_and(OrderbookState::is_initialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ticker: &str) -> OrderbookSnapshotData {
        OrderbookSnapshotData {
            market_ticker: ticker.to_string(),
            yes: Some(vec![[45, 100], [50, 200]]),
            yes_dollars: None,
            no: Some(vec![[40, 150]]),
            no_dollars: None,
        }
    }

    #[test]
    fn test_apply_snapshot_and_summary() {
        let store = OrderBookStore::new();
        store.apply_snapshot(&snapshot("T1"));

        let summary = store.summary("T1").unwrap();
        assert_eq!(summary.best_yes_bid, Some((50, 200)));
        assert_eq!(summary.best_yes_ask, Some((60, 150)));
    }

    #[test]
    fn test_apply_delta_updates_store() {
        let store = OrderBookStore::new();
        store.apply_snapshot(&snapshot("T1"));

        let delta = OrderbookDeltaData {
            market_ticker: "T1".to_string(),
            price: 50,
            delta: -200,
            side: Side::Yes,
            price_dollars: None,
            client_order_id: None,
        };
        let new_qty = store.apply_delta(&delta);
        assert_eq!(new_qty, Some(0));
        assert_eq!(store.best_yes_bid("T1"), Some((45, 100)));
    }

    #[test]
    fn test_apply_delta_unknown_ticker_is_noop() {
        let store = OrderBookStore::new();
        let delta = OrderbookDeltaData {
            market_ticker: "UNKNOWN".to_string(),
            price: 50,
            delta: 100,
            side: Side::Yes,
            price_dollars: None,
            client_order_id: None,
        };
        assert_eq!(store.apply_delta(&delta), None);
        assert!(store.summary("UNKNOWN").is_none());
        assert!(store.tracked_markets().is_empty());
    }

    #[test]
    fn test_clear_market() {
        let store = OrderBookStore::new();
        store.apply_snapshot(&snapshot("T1"));
        store.clear_market("T1");
        assert!(store.summary("T1").is_none());
    }

    #[test]
    fn test_clear_all() {
        let store = OrderBookStore::new();
        store.apply_snapshot(&snapshot("T1"));
        store.apply_snapshot(&snapshot("T2"));
        store.clear();
        assert!(store.tracked_markets().is_empty());
    }

    #[test]
    fn test_unknown_market_returns_none() {
        let store = OrderBookStore::new();
        assert!(store.summary("UNKNOWN").is_none());
        assert_eq!(store.depth_at_price("UNKNOWN", Side::Yes, 50), 0);
    }
}
