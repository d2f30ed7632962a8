//! OHLCV series model and validation

use crate::error::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Static metadata attached to a series once, not per bar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
}

/// Enrichment columns computed at fetch time, each aligned with the bar
/// sequence (NaN before its window fills)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedColumns {
    pub sma_20: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub ema_12: Vec<f64>,
    pub ema_26: Vec<f64>,
    /// Rolling 20-period annualized volatility of daily returns
    pub volatility: Vec<f64>,
    /// Rolling 5-period mean of close * volume
    pub avg_value_traded: Vec<f64>,
}

/// A time-ordered daily OHLCV price series for one symbol
///
/// Bars are expected to be strictly increasing by date. Chronological order is
/// a precondition guaranteed by the data source, not checked here; rolling
/// computations downstream assume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub meta: SeriesMeta,
    #[serde(default)]
    pub derived: Option<DerivedColumns>,
}

impl OhlcvSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            meta: SeriesMeta::default(),
            derived: None,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Check the series for minimal sufficiency before indicator computation
    ///
    /// Fails on an empty series or on any bar whose open/high/low/close is
    /// non-finite (the typed equivalent of a missing cell in the source data).
    pub fn validate(&self) -> Result<(), DataError> {
        if self.bars.is_empty() {
            return Err(DataError::Empty {
                symbol: self.symbol.clone(),
            });
        }

        for (index, bar) in self.bars.iter().enumerate() {
            let fields = [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(DataError::MissingField {
                        symbol: self.symbol.clone(),
                        index,
                        field,
                    });
                }
            }
        }

        Ok(())
    }
}
