//! Data models for the Kalshi API.
//!
//! All monetary values are in cents unless noted otherwise.
//! Fields ending in `_dollars` are fixed-point dollar strings.

mod balance;
mod common;
mod market;
mod order;
mod position;
pub(crate) mod query;

pub use balance::BalanceResponse;
pub use common::{Action, OrderStatus, OrderType, SelfTradePreventionType, Side, cents_to_dollars};
pub use market::{
    GetMarketsParams, Market, MarketFilterStatus, MarketResponse, MarketResult, MarketStatus,
    MarketType, MarketsResponse, MveFilter, MveSelectedLeg, PriceRange, StrikeType,
};
pub use order::{CreateOrderRequest, GetOrdersParams, Order, OrderResponse, OrdersResponse};
pub use position::{EventPosition, GetPositionsParams, MarketPosition, PositionsResponse};
