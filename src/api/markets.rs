//! Markets API endpoints.

use crate::{
    client::HttpClient,
    error::Result,
    models::{GetMarketsParams, MarketResponse, MarketsResponse},
};

/// Get a list of markets with optional filtering.
///
/// Returns markets matching the provided query parameters.
pub async fn get_markets(http: &HttpClient, params: GetMarketsParams) -> Result<MarketsResponse> {
    let path = format!("/markets{}", params.to_query_string());
    http.get(&path).await
}

/// Get details for a specific market by ticker.
pub async fn get_market(http: &HttpClient, ticker: &str) -> Result<MarketResponse> {
    let path = format!("/markets/{}", ticker);
    http.get(&path).await
}
