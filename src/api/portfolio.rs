//! Portfolio API endpoints.

use crate::{
    client::HttpClient,
    error::Result,
    models::{BalanceResponse, GetOrdersParams, GetPositionsParams, OrdersResponse, PositionsResponse},
};

/// Get the current account balance.
///
/// Returns the available balance and portfolio value in cents.
pub async fn get_balance(http: &HttpClient) -> Result<BalanceResponse> {
    http.get("/portfolio/balance").await
}

/// Get positions with the given query parameters.
pub async fn get_positions(
    http: &HttpClient,
    params: GetPositionsParams,
) -> Result<PositionsResponse> {
    let path = format!("/portfolio/positions{}", params.to_query_string());
    http.get(&path).await
}

/// Get resting/executed orders with the given query parameters.
///
/// Used during periodic reconciliation to cross-check locally tracked positions
/// against the exchange's own order ledger.
pub async fn get_orders(http: &HttpClient, params: GetOrdersParams) -> Result<OrdersResponse> {
    let path = format!("/portfolio/orders{}", params.to_query_string());
    http.get(&path).await
}
