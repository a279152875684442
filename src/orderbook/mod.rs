//! Orderbook state management.
//!
//! [`OrderBookStore`] is a registry of per-market order book state. BookFeed
//! applies every `orderbook_snapshot`/`orderbook_delta` message it receives
//! directly against the store; there's no internal broadcast here, since
//! fan-out to local subscribers is the bus module's job.
//!
//! # YES/NO Price Relationship
//!
//! In Kalshi prediction markets:
//! - YES bid at 45 = someone will buy YES at 45 cents
//! - NO bid at 55 = someone will sell YES at 45 cents (since 100 - 55 = 45)
//! - Best YES ask = 100 - best NO bid price
//!
//! [`OrderBookStore`] handles this conversion automatically when reporting
//! best ask prices.

mod aggregator;
mod state;

pub use aggregator::{OrderBookStore, OrderbookSummary};
