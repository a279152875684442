//! Order models and query parameters.

use serde::{Deserialize, Serialize};

use super::common::{Action, OrderStatus, OrderType, SelfTradePreventionType, Side};
use super::query::QueryBuilder;

/// Request body for `POST /portfolio/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub ticker: String,
    pub action: Action,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub count: i64,
    /// Limit price in cents (1-99). Required for `OrderType::Limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<i64>,
    /// Limit price in cents (1-99), expressed on the NO side. At most one of
    /// `yes_price`/`no_price` is set; Kalshi derives the other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<i64>,
    /// Client-generated idempotency key. Required on every order.
    pub client_order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_trade_prevention_type: Option<SelfTradePreventionType>,
}

impl CreateOrderRequest {
    /// Build a limit order priced on the YES side, in cents (1-99).
    #[must_use]
    pub fn limit_yes(
        ticker: impl Into<String>,
        action: Action,
        count: i64,
        yes_price: i64,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            action,
            side: Side::Yes,
            order_type: OrderType::Limit,
            count,
            yes_price: Some(yes_price),
            no_price: None,
            client_order_id: client_order_id.into(),
            self_trade_prevention_type: None,
        }
    }

    /// Build a limit order priced on the NO side, in cents (1-99).
    #[must_use]
    pub fn limit_no(
        ticker: impl Into<String>,
        action: Action,
        count: i64,
        no_price: i64,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            action,
            side: Side::No,
            order_type: OrderType::Limit,
            count,
            yes_price: None,
            no_price: Some(no_price),
            client_order_id: client_order_id.into(),
            self_trade_prevention_type: None,
        }
    }

    /// Build a market order on the YES side. Market orders carry no price;
    /// Kalshi fills at the best available price.
    #[must_use]
    pub fn market_yes(
        ticker: impl Into<String>,
        action: Action,
        count: i64,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            action,
            side: Side::Yes,
            order_type: OrderType::Market,
            count,
            yes_price: None,
            no_price: None,
            client_order_id: client_order_id.into(),
            self_trade_prevention_type: None,
        }
    }

    /// Build a market order on the NO side.
    #[must_use]
    pub fn market_no(
        ticker: impl Into<String>,
        action: Action,
        count: i64,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            action,
            side: Side::No,
            order_type: OrderType::Market,
            count,
            yes_price: None,
            no_price: None,
            client_order_id: client_order_id.into(),
            self_trade_prevention_type: None,
        }
    }

    #[must_use]
    pub fn self_trade_prevention_type(mut self, stp: SelfTradePreventionType) -> Self {
        self.self_trade_prevention_type = Some(stp);
        self
    }
}

/// An order in the Kalshi exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    pub ticker: String,
    pub side: Side,
    pub action: Action,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Price in cents.
    pub yes_price: i64,
    /// Price in cents.
    pub no_price: i64,
    /// Price in fixed-point dollars.
    #[serde(default)]
    pub yes_price_dollars: Option<String>,
    /// Price in fixed-point dollars.
    #[serde(default)]
    pub no_price_dollars: Option<String>,
    pub fill_count: i64,
    pub remaining_count: i64,
    pub initial_count: i64,
    /// Fees in cents.
    #[serde(default)]
    pub taker_fees: Option<i64>,
    /// Fees in cents.
    #[serde(default)]
    pub maker_fees: Option<i64>,
    /// Cost in cents.
    #[serde(default)]
    pub taker_fill_cost: Option<i64>,
    /// Cost in cents.
    #[serde(default)]
    pub maker_fill_cost: Option<i64>,
    #[serde(default)]
    pub taker_fill_cost_dollars: Option<String>,
    #[serde(default)]
    pub maker_fill_cost_dollars: Option<String>,
    #[serde(default)]
    pub taker_fees_dollars: Option<String>,
    #[serde(default)]
    pub maker_fees_dollars: Option<String>,
    /// Deprecated.
    #[serde(default)]
    pub queue_position: Option<i64>,
    #[serde(default)]
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_update_time: Option<String>,
    #[serde(default)]
    pub self_trade_prevention_type: Option<SelfTradePreventionType>,
    #[serde(default)]
    pub order_group_id: Option<String>,
    #[serde(default)]
    pub cancel_order_on_pause: Option<bool>,
}

/// Response from `POST /portfolio/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// Response from the get_orders endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Query parameters for the get_orders endpoint.
#[derive(Debug, Default, Clone, Serialize)]
pub struct GetOrdersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl GetOrdersParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    #[must_use]
    pub fn event_ticker(mut self, event_ticker: impl Into<String>) -> Self {
        self.event_ticker = Some(event_ticker.into());
        self
    }

    #[must_use]
    pub fn min_ts(mut self, ts: i64) -> Self {
        self.min_ts = Some(ts);
        self
    }

    #[must_use]
    pub fn max_ts(mut self, ts: i64) -> Self {
        self.max_ts = Some(ts);
        self
    }

    #[must_use]
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the maximum number of results to return.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `limit` is not in the range 1..=1000.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        debug_assert!(
            limit > 0 && limit <= 1000,
            "limit must be between 1 and 1000, got {}",
            limit
        );
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut qb = QueryBuilder::new();
        qb.push_opt("ticker", self.ticker.as_ref());
        qb.push_opt("event_ticker", self.event_ticker.as_ref());
        qb.push_opt("min_ts", self.min_ts);
        qb.push_opt("max_ts", self.max_ts);
        qb.push_opt("status", self.status.map(|s| s.as_str()));
        qb.push_opt("limit", self.limit);
        qb.push_opt("cursor", self.cursor.as_ref());
        qb.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_with_status() {
        let params = GetOrdersParams::new().status(OrderStatus::Resting);
        assert_eq!(params.to_query_string(), "?status=resting");
    }

    #[test]
    fn test_create_order_request_serializes_yes_price() {
        let req = CreateOrderRequest::limit_yes("TICKER", Action::Buy, 5, 45, "abc-123");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["side"], "yes");
        assert_eq!(json["type"], "limit");
        assert_eq!(json["yes_price"], 45);
        assert!(json.get("no_price").is_none());
        assert_eq!(json["client_order_id"], "abc-123");
    }

    #[test]
    fn test_create_order_request_no_side() {
        let req = CreateOrderRequest::limit_no("TICKER", Action::Sell, 2, 30, "def-456");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["side"], "no");
        assert_eq!(json["no_price"], 30);
        assert!(json.get("yes_price").is_none());
    }

    #[test]
    fn test_create_order_request_market_yes_has_no_price() {
        let req = CreateOrderRequest::market_yes("TICKER", Action::Buy, 5, "ghi-789");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["side"], "yes");
        assert_eq!(json["type"], "market");
        assert!(json.get("yes_price").is_none());
        assert!(json.get("no_price").is_none());
    }

    #[test]
    fn test_create_order_request_market_no_has_no_price() {
        let req = CreateOrderRequest::market_no("TICKER", Action::Buy, 5, "jkl-012");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["side"], "no");
        assert_eq!(json["type"], "market");
        assert!(json.get("yes_price").is_none());
        assert!(json.get("no_price").is_none());
    }
}
