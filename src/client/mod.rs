//! Signed REST facade used by BookFeed's ticker-set fetch and by the Trader (component I).

mod http;

pub use http::HttpClient;

use crate::auth::KalshiConfig;
use crate::error::Result;

/// Which Kalshi deployment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Demo,
    Prod,
}

impl Environment {
    /// Base URL for REST requests (no trailing slash).
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Demo => "https://demo-api.kalshi.co",
            Environment::Prod => "https://api.elections.kalshi.com",
        }
    }

    /// WebSocket upgrade URL.
    pub fn ws_url(&self) -> &'static str {
        match self {
            Environment::Demo => "wss://demo-api.kalshi.co/trade-api/ws/v2",
            Environment::Prod => "wss://api.elections.kalshi.com/trade-api/ws/v2",
        }
    }

    /// Path prefix included in the signed message, preceding the request path.
    pub fn api_path_prefix(&self) -> &'static str {
        "/trade-api/v2"
    }
}

/// Signed REST client for the exchange (component I of the engine).
///
/// Thin wrapper over [`HttpClient`] that exposes the handful of endpoints the
/// BookFeed ticker-set refresh and the Trader actually call (§6.1).
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    http: HttpClient,
}

impl ExchangeClient {
    pub fn new(config: KalshiConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// The underlying generically-signed HTTP client, for callers (api/*) that
    /// need the raw verb methods.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn environment(&self) -> Environment {
        self.http.environment()
    }
}
