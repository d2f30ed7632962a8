//! Multi-symbol comparison engine
//!
//! Consumes one indicator bundle plus close-price sequence per symbol and
//! produces a performance table, a pairwise Pearson correlation matrix, and
//! metric-based rankings. Pure transform over already-resident data; symbol
//! insertion order is preserved everywhere and breaks ranking ties.

use crate::analysis::{IndicatorBundle, Trend};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Per-symbol input to the comparison
#[derive(Debug, Clone)]
pub struct ComparisonInput {
    pub symbol: String,
    pub bundle: IndicatorBundle,
    /// Close prices aligned by position across symbols; equal lengths are the
    /// caller's contract, pairs are zipped to the shorter sequence
    pub closes: Vec<f64>,
}

/// Projection of the headline performance fields for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub symbol: String,
    pub price_change_pct: f64,
    pub avg_volume: f64,
    pub volatility: f64,
    pub rsi: f64,
    pub trend: Trend,
}

/// Symmetric pairwise correlation matrix over the symbols' close prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

/// Symbols ordered best-first per ranking metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    /// Descending by price_change_pct
    #[serde(rename = "return")]
    pub by_return: Vec<String>,
    /// Descending by avg_volume
    #[serde(rename = "volume")]
    pub by_volume: Vec<String>,
    /// Descending by RSI
    #[serde(rename = "momentum")]
    pub by_momentum: Vec<String>,
}

/// Result of a multi-symbol comparison, built once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub performance: Vec<PerformanceRow>,
    pub correlations: CorrelationMatrix,
    pub rankings: Rankings,
}

/// Compare indicator bundles across symbols
pub fn compare(inputs: &[ComparisonInput]) -> ComparisonResult {
    let performance: Vec<PerformanceRow> = inputs
        .iter()
        .map(|input| PerformanceRow {
            symbol: input.symbol.clone(),
            price_change_pct: input.bundle.price_change_pct,
            avg_volume: input.bundle.avg_volume,
            volatility: input.bundle.volatility,
            rsi: input.bundle.rsi,
            trend: input.bundle.trend,
        })
        .collect();

    let symbols: Vec<String> = inputs.iter().map(|i| i.symbol.clone()).collect();
    let values = symbols
        .iter()
        .enumerate()
        .map(|(i, _)| {
            (0..inputs.len())
                .map(|j| pearson(&inputs[i].closes, &inputs[j].closes))
                .collect()
        })
        .collect();

    let rankings = Rankings {
        by_return: rank_descending(&performance, |row| row.price_change_pct),
        by_volume: rank_descending(&performance, |row| row.avg_volume),
        by_momentum: rank_descending(&performance, |row| row.rsi),
    };

    ComparisonResult {
        performance,
        correlations: CorrelationMatrix { symbols, values },
        rankings,
    }
}

/// Pearson correlation of two positionally-aligned sequences
///
/// NaN for zero-variance inputs or fewer than two paired points.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let x = &x[..n];
    let y = &y[..n];

    let mx = x.iter().sum::<f64>() / n as f64;
    let my = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}

// Stable descending sort over insertion order; NaN metrics sort last
fn rank_descending(rows: &[PerformanceRow], metric: impl Fn(&PerformanceRow) -> f64) -> Vec<String> {
    let mut indexed: Vec<(usize, f64)> = rows.iter().map(|r| metric(r)).enumerate().collect();
    indexed.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
    });
    indexed
        .into_iter()
        .map(|(i, _)| rows[i].symbol.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(price_change_pct: f64, avg_volume: f64, rsi: f64) -> IndicatorBundle {
        IndicatorBundle {
            avg_price: 100.0,
            price_change: price_change_pct,
            price_change_pct,
            avg_volume,
            volatility: 10.0,
            max_daily_gain: 1.0,
            max_daily_loss: -1.0,
            trend: if price_change_pct > 0.0 {
                Trend::Upward
            } else {
                Trend::Downward
            },
            macd: 0.0,
            macd_signal: 0.0,
            rsi,
            stoch_k: 50.0,
            stoch_d: 50.0,
            bb_upper: 102.0,
            bb_middle: 100.0,
            bb_lower: 98.0,
            sector: None,
            industry: None,
            market_cap: None,
            sma_20: None,
            sma_50: None,
            ema_12: None,
            ema_26: None,
            rolling_volatility: None,
            avg_value_traded: None,
        }
    }

    fn input(symbol: &str, pct: f64, volume: f64, rsi: f64, closes: Vec<f64>) -> ComparisonInput {
        ComparisonInput {
            symbol: symbol.to_string(),
            bundle: bundle(pct, volume, rsi),
            closes,
        }
    }

    #[test]
    fn test_performance_projection_preserves_order() {
        let result = compare(&[
            input("BBB", -2.0, 10.0, 40.0, vec![1.0, 2.0, 3.0]),
            input("AAA", 10.0, 20.0, 60.0, vec![3.0, 2.0, 1.0]),
        ]);

        let symbols: Vec<&str> = result.performance.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BBB", "AAA"]);
        assert_eq!(result.performance[1].price_change_pct, 10.0);
        assert_eq!(result.performance[0].trend, Trend::Downward);
    }

    #[test]
    fn test_correlation_symmetric_unit_diagonal() {
        let result = compare(&[
            input("AAA", 1.0, 1.0, 50.0, vec![1.0, 2.0, 3.0, 4.0]),
            input("BBB", 1.0, 1.0, 50.0, vec![2.0, 4.0, 6.0, 8.0]),
            input("CCC", 1.0, 1.0, 50.0, vec![4.0, 3.0, 2.0, 1.0]),
        ]);

        let corr = &result.correlations;
        for i in 0..3 {
            assert!((corr.get(i, i) - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((corr.get(i, j) - corr.get(j, i)).abs() < 1e-12);
            }
        }
        // AAA and BBB are perfectly positively correlated, CCC inverts them
        assert!((corr.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((corr.get(0, 2) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_zero_variance_is_nan() {
        let result = compare(&[
            input("AAA", 1.0, 1.0, 50.0, vec![5.0, 5.0, 5.0]),
            input("BBB", 1.0, 1.0, 50.0, vec![1.0, 2.0, 3.0]),
        ]);

        assert!(result.correlations.get(0, 0).is_nan());
        assert!(result.correlations.get(0, 1).is_nan());
        assert!((result.correlations.get(1, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rankings_scenario() {
        let result = compare(&[
            input("AAA", 10.0, 5.0, 70.0, vec![1.0, 2.0]),
            input("BBB", -2.0, 15.0, 30.0, vec![1.0, 2.0]),
            input("CCC", 4.0, 10.0, 50.0, vec![1.0, 2.0]),
        ]);

        assert_eq!(result.rankings.by_return, vec!["AAA", "CCC", "BBB"]);
        assert_eq!(result.rankings.by_volume, vec!["BBB", "CCC", "AAA"]);
        assert_eq!(result.rankings.by_momentum, vec!["AAA", "CCC", "BBB"]);
    }

    #[test]
    fn test_ranking_ties_break_by_insertion_order() {
        let result = compare(&[
            input("AAA", 5.0, 1.0, 50.0, vec![1.0, 2.0]),
            input("BBB", 5.0, 1.0, 50.0, vec![1.0, 2.0]),
            input("CCC", 3.0, 1.0, 50.0, vec![1.0, 2.0]),
        ]);

        assert_eq!(result.rankings.by_return, vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn test_ranking_nan_sorts_last() {
        let result = compare(&[
            input("AAA", 1.0, 1.0, f64::NAN, vec![1.0, 2.0]),
            input("BBB", 2.0, 1.0, 20.0, vec![1.0, 2.0]),
        ]);

        assert_eq!(result.rankings.by_momentum, vec!["BBB", "AAA"]);
    }

    #[test]
    fn test_mismatched_lengths_zip_to_shorter() {
        let result = compare(&[
            input("AAA", 1.0, 1.0, 50.0, vec![1.0, 2.0, 3.0, 4.0, 100.0]),
            input("BBB", 1.0, 1.0, 50.0, vec![2.0, 4.0, 6.0, 8.0]),
        ]);

        assert!((result.correlations.get(0, 1) - 1.0).abs() < 1e-12);
    }
}
