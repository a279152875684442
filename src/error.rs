//! Error types shared across the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Failed to read private key file '{0}': {1}")]
    PrivateKeyFileError(String, String),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(String),

    #[error("Invalid price {0}: must be between 1 and 99")]
    InvalidPrice(i64),

    #[error("Invalid quantity {0}: must be positive")]
    InvalidQuantity(i64),

    #[error("Market tickers required for channels: {0}")]
    MissingMarketTickers(String),

    #[error("Invalid limit {0}: must be between {1} and {2}")]
    InvalidLimit(i64, i64, i64),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
