//! Real-time Kalshi market-data and trading engine.
//!
//! This crate streams order books over Kalshi's authenticated WebSocket API,
//! persists book events and portfolio positions to an embedded SQLite
//! database, polls weather sensor and forecast sources, fans out a unified
//! update feed to local subscribers over a WebSocket gateway, and runs a
//! momentum trader against the resulting signal.
//!
//! # Quick Start
//!
//! ```ignore
//! use kalshi_trade_rs::{KalshiConfig, ExchangeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = KalshiConfig::from_env()?;
//!     let client = ExchangeClient::new(config)?;
//!
//!     let balance = kalshi_trade_rs::api::get_balance(client.http()).await?;
//!     println!("Balance: ${:.2}", kalshi_trade_rs::cents_to_dollars(balance.balance));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `PROD_KEYID`: Your Kalshi API key ID.
//! - `PROD_KEYFILE`: Path to your RSA private key PEM file.
//!
//! See [`config::Config`] for the full set of variables the engine binary reads.

pub mod api;
pub mod auth;
pub mod bus;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod orderbook;
pub mod persistence;
pub mod polls;
pub mod trader;
pub mod ws;

pub use auth::KalshiConfig;
pub use client::{Environment, ExchangeClient, HttpClient};
pub use error::{Error, Result};
pub use models::{
    Action, BalanceResponse, CreateOrderRequest, EventPosition, GetMarketsParams, GetOrdersParams,
    GetPositionsParams, Market, MarketFilterStatus, MarketPosition, MarketResponse, MarketResult,
    MarketStatus, MarketType, MarketsResponse, MveFilter, Order, OrderResponse, OrderStatus,
    OrderType, OrdersResponse, PositionsResponse, PriceRange, SelfTradePreventionType, Side,
    StrikeType, cents_to_dollars,
};

pub use ws::{
    BookFeed, Channel, ConnectStrategy, KalshiStreamClient, KalshiStreamHandle, StreamMessage,
    StreamUpdate, SubscribeResult,
};

pub use orderbook::{OrderBookStore, OrderbookSummary};
