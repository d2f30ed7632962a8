//! Stock analysis and AI-insight generation
//!
//! This crate turns a daily OHLCV price history into a flat bundle of
//! technical indicators and AI-generated insights:
//!
//! - Price history from Yahoo Finance, enriched with fetch-time columns
//!   (SMA/EMA/rolling volatility/average value traded)
//! - Series validation before any computation
//! - A pure indicator engine: returns, volatility, MACD, RSI, Bollinger
//!   Bands, Stochastic Oscillator, trend classification
//! - Multi-symbol comparison: performance table, price correlations,
//!   metric rankings
//! - Insight generation through a pluggable AI provider, with an on-disk
//!   cache keyed by symbol and timeframe
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_stock::{AppConfig, StockInsight, Timeframe};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::builder().api_key(key).build()?;
//!     let app = StockInsight::new(config)?;
//!     let report = app.analyze("AAPL", Timeframe::ThreeMonths).await?;
//!     println!("{}", report.insights);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod app;
pub mod cache;
pub mod comparison;
pub mod config;
pub mod console;
pub mod error;
pub mod prompt;
pub mod rolling;
pub mod series;
pub mod timeframe;

// Re-export main types for convenience
pub use analysis::{IndicatorBundle, Trend, compute};
pub use app::{BatchOutcome, StockInsight, SymbolReport};
pub use comparison::{ComparisonInput, ComparisonResult, compare};
pub use config::AppConfig;
pub use error::{DataError, FetchError, Result, StockError};
pub use series::{Bar, OhlcvSeries};
pub use timeframe::Timeframe;

// Re-export the provider kind for configuration
pub use insight_llm::ProviderKind;
