//! Technical-indicator engine
//!
//! Pure, deterministic transform from an OHLCV series to a flat
//! [`IndicatorBundle`] of last-bar indicator values. Never performs I/O and
//! never fails for a validated series: numerically undefined results
//! (insufficient window history, zero-division in RSI) surface as NaN.

use crate::rolling;
use crate::series::OhlcvSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const MACD_FAST_SPAN: usize = 12;
const MACD_SLOW_SPAN: usize = 26;
const MACD_SIGNAL_SPAN: usize = 9;
const RSI_WINDOW: usize = 14;
const BB_WINDOW: usize = 20;
const BB_STD_MULT: f64 = 2.0;
const STOCH_WINDOW: usize = 14;
const STOCH_SMOOTH: usize = 3;

/// Categorical price trend over the series
///
/// Binary by design: a zero price change classifies as Downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Upward,
    Downward,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upward => write!(f, "Upward"),
            Self::Downward => write!(f, "Downward"),
        }
    }
}

/// Flat bundle of indicator values computed against the last bar of a series
///
/// Constructed fresh per (symbol, timeframe) request and immutable once
/// returned. Optional fields are static metadata and fetch-time enrichment
/// columns passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub avg_price: f64,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub avg_volume: f64,
    pub volatility: f64,
    pub max_daily_gain: f64,
    pub max_daily_loss: f64,
    pub trend: Trend,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(rename = "SMA_20", skip_serializing_if = "Option::is_none")]
    pub sma_20: Option<f64>,
    #[serde(rename = "SMA_50", skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,
    #[serde(rename = "EMA_12", skip_serializing_if = "Option::is_none")]
    pub ema_12: Option<f64>,
    #[serde(rename = "EMA_26", skip_serializing_if = "Option::is_none")]
    pub ema_26: Option<f64>,
    #[serde(rename = "Volatility", skip_serializing_if = "Option::is_none")]
    pub rolling_volatility: Option<f64>,
    #[serde(rename = "Avg_Value_Traded", skip_serializing_if = "Option::is_none")]
    pub avg_value_traded: Option<f64>,
}

impl IndicatorBundle {
    /// Render every field to its display form: numeric values to two decimal
    /// places, categorical values as text
    ///
    /// This map is what the prompt builder and the insight cache consume, so
    /// cache-hit equality is defined over it.
    pub fn display_map(&self) -> BTreeMap<String, String> {
        fn two_dp(value: f64) -> String {
            format!("{value:.2}")
        }

        let mut map = BTreeMap::new();
        map.insert("avg_price".to_string(), two_dp(self.avg_price));
        map.insert("price_change".to_string(), two_dp(self.price_change));
        map.insert("price_change_pct".to_string(), two_dp(self.price_change_pct));
        map.insert("avg_volume".to_string(), two_dp(self.avg_volume));
        map.insert("volatility".to_string(), two_dp(self.volatility));
        map.insert("max_daily_gain".to_string(), two_dp(self.max_daily_gain));
        map.insert("max_daily_loss".to_string(), two_dp(self.max_daily_loss));
        map.insert("trend".to_string(), self.trend.to_string());
        map.insert("macd".to_string(), two_dp(self.macd));
        map.insert("macd_signal".to_string(), two_dp(self.macd_signal));
        map.insert("rsi".to_string(), two_dp(self.rsi));
        map.insert("stoch_k".to_string(), two_dp(self.stoch_k));
        map.insert("stoch_d".to_string(), two_dp(self.stoch_d));
        map.insert("bb_upper".to_string(), two_dp(self.bb_upper));
        map.insert("bb_middle".to_string(), two_dp(self.bb_middle));
        map.insert("bb_lower".to_string(), two_dp(self.bb_lower));

        if let Some(sector) = &self.sector {
            map.insert("sector".to_string(), sector.clone());
        }
        if let Some(industry) = &self.industry {
            map.insert("industry".to_string(), industry.clone());
        }
        let optional_numeric = [
            ("market_cap", self.market_cap),
            ("SMA_20", self.sma_20),
            ("SMA_50", self.sma_50),
            ("EMA_12", self.ema_12),
            ("EMA_26", self.ema_26),
            ("Volatility", self.rolling_volatility),
            ("Avg_Value_Traded", self.avg_value_traded),
        ];
        for (key, value) in optional_numeric {
            if let Some(v) = value {
                map.insert(key.to_string(), two_dp(v));
            }
        }

        map
    }
}

/// Daily percentage returns aligned with the close sequence
///
/// Index 0 is NaN (undefined), index i holds `(close[i]/close[i-1] - 1) * 100`.
pub(crate) fn daily_returns_pct(closes: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    for (i, &c) in closes.iter().enumerate() {
        if i == 0 {
            out.push(f64::NAN);
        } else {
            out.push((c / closes[i - 1] - 1.0) * 100.0);
        }
    }
    out
}

/// Compute the full indicator bundle for a series
///
/// Callers are expected to have run [`OhlcvSeries::validate`] first; an empty
/// series still produces a bundle, with every windowed field NaN.
pub fn compute(series: &OhlcvSeries) -> IndicatorBundle {
    let closes = series.closes();
    let highs = series.highs();
    let lows = series.lows();
    let volumes = series.volumes();

    let first_close = closes.first().copied().unwrap_or(f64::NAN);
    let last_close = closes.last().copied().unwrap_or(f64::NAN);

    let returns = daily_returns_pct(&closes);
    let defined_returns = if returns.is_empty() { &[][..] } else { &returns[1..] };

    let price_change = last_close - first_close;
    let price_change_pct = (last_close / first_close - 1.0) * 100.0;

    // Annualized over the entire series, not a rolling window
    let volatility = rolling::sample_std(defined_returns) * TRADING_DAYS_PER_YEAR.sqrt();

    let max_daily_gain = defined_returns
        .iter()
        .copied()
        .fold(f64::NAN, f64::max);
    let max_daily_loss = defined_returns
        .iter()
        .copied()
        .fold(f64::NAN, f64::min);

    let trend = if price_change > 0.0 {
        Trend::Upward
    } else {
        Trend::Downward
    };

    // MACD: fast EMA minus slow EMA, signal is an EMA of the MACD line
    let ema_fast = rolling::ema(&closes, MACD_FAST_SPAN);
    let ema_slow = rolling::ema(&closes, MACD_SLOW_SPAN);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = rolling::ema(&macd_line, MACD_SIGNAL_SPAN);

    // RSI from separate rolling means of positive and negated-negative deltas.
    // The undefined first delta counts as zero in both windows, so RSI is
    // defined once the series reaches the window length itself.
    let deltas = close_deltas(&closes);
    let gains: Vec<f64> = deltas
        .iter()
        .map(|d| if d.is_nan() { 0.0 } else { d.max(0.0) })
        .collect();
    let losses: Vec<f64> = deltas
        .iter()
        .map(|d| if d.is_nan() { 0.0 } else { (-d).max(0.0) })
        .collect();
    let avg_gain = last(&rolling::rolling_mean(&gains, RSI_WINDOW));
    let avg_loss = last(&rolling::rolling_mean(&losses, RSI_WINDOW));
    let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);

    // Bollinger Bands around the rolling mean
    let bb_middle_series = rolling::rolling_mean(&closes, BB_WINDOW);
    let bb_std_series = rolling::rolling_std(&closes, BB_WINDOW);
    let bb_middle = last(&bb_middle_series);
    let bb_std = last(&bb_std_series);
    let bb_upper = bb_middle + BB_STD_MULT * bb_std;
    let bb_lower = bb_middle - BB_STD_MULT * bb_std;

    // Stochastic oscillator against the recent high/low range
    let low_n = rolling::rolling_min(&lows, STOCH_WINDOW);
    let high_n = rolling::rolling_max(&highs, STOCH_WINDOW);
    let k_series: Vec<f64> = closes
        .iter()
        .zip(low_n.iter().zip(&high_n))
        .map(|(c, (lo, hi))| 100.0 * (c - lo) / (hi - lo))
        .collect();
    let stoch_k = last(&k_series);
    let stoch_d = last(&rolling::rolling_mean(&k_series, STOCH_SMOOTH));

    let derived = series.derived.as_ref();

    IndicatorBundle {
        avg_price: rolling::mean(&closes),
        price_change,
        price_change_pct,
        avg_volume: rolling::mean(&volumes),
        volatility,
        max_daily_gain,
        max_daily_loss,
        trend,
        macd: last(&macd_line),
        macd_signal: last(&signal_line),
        rsi,
        stoch_k,
        stoch_d,
        bb_upper,
        bb_middle,
        bb_lower,
        sector: series.meta.sector.clone(),
        industry: series.meta.industry.clone(),
        market_cap: series.meta.market_cap,
        sma_20: derived.map(|d| last(&d.sma_20)),
        sma_50: derived.map(|d| last(&d.sma_50)),
        ema_12: derived.map(|d| last(&d.ema_12)),
        ema_26: derived.map(|d| last(&d.ema_26)),
        rolling_volatility: derived.map(|d| last(&d.volatility)),
        avg_value_traded: derived.map(|d| last(&d.avg_value_traded)),
    }
}

// Absolute close-to-close deltas aligned with the series, NaN at index 0
fn close_deltas(closes: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    for (i, &c) in closes.iter().enumerate() {
        if i == 0 {
            out.push(f64::NAN);
        } else {
            out.push(c - closes[i - 1]);
        }
    }
    out
}

fn last(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(f64::NAN)
}
