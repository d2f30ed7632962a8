//! Error types for stock analysis operations

use thiserror::Error;

/// Series-level validation errors
///
/// Fatal for the affected symbol's request; never retried.
#[derive(Debug, Error)]
pub enum DataError {
    /// The series contains no bars
    #[error("empty series for {symbol}")]
    Empty { symbol: String },

    /// A bar carries a non-finite price value
    #[error("bar {index} of {symbol} is missing {field}")]
    MissingField {
        symbol: String,
        index: usize,
        field: &'static str,
    },
}

/// Errors from the price-history data source
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source returned an empty history
    #[error("no data available for {symbol} in the requested range")]
    NoData { symbol: String },

    /// Symbol failed input validation (alphabetic characters only)
    #[error("invalid symbol: {0}. Only alphabetic characters are allowed")]
    InvalidSymbol(String),

    /// The source request itself failed
    #[error("Yahoo Finance error for {symbol}: {reason}")]
    Source { symbol: String, reason: String },
}

/// Top-level error for stock analysis operations
#[derive(Debug, Error)]
pub enum StockError {
    /// Insufficient or malformed series
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Network or source failure while fetching price history
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// AI-provider failure (rate limit, auth, request)
    #[error("provider error: {0}")]
    Provider(#[from] insight_llm::ProviderError),

    /// Unrecognized timeframe argument
    #[error("invalid timeframe: {0}. Valid options are: 1d, 5d, 1mo, 3mo, 6mo, 1y")]
    InvalidTimeframe(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Cache read/write failure
    #[error("cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error from the news source
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
