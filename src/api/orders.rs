//! Orders API endpoints.

use crate::{
    client::HttpClient,
    error::Result,
    models::{CreateOrderRequest, OrderResponse},
};

/// Submit an order to the exchange.
pub async fn create_order(http: &HttpClient, request: CreateOrderRequest) -> Result<OrderResponse> {
    http.post("/portfolio/orders", &request).await
}
