//! Yahoo Finance price-history client

use crate::error::FetchError;
use crate::rolling;
use crate::series::{Bar, DerivedColumns, OhlcvSeries, SeriesMeta};
use crate::timeframe::Timeframe;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, info};
use yahoo_finance_api as yahoo;

const SMA_SHORT_WINDOW: usize = 20;
const SMA_LONG_WINDOW: usize = 50;
const EMA_FAST_SPAN: usize = 12;
const EMA_SLOW_SPAN: usize = 26;
const VOLATILITY_WINDOW: usize = 20;
const VALUE_TRADED_WINDOW: usize = 5;
const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance client producing enriched OHLCV series
pub struct YahooClient {
    http: reqwest::Client,
}

impl YahooClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Fetch daily history for a symbol over the given timeframe
    ///
    /// The returned series carries the fetch-time enrichment columns
    /// (SMA/EMA/rolling volatility/average value traded) alongside the bars.
    pub async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<OhlcvSeries, FetchError> {
        let (start, end) = timeframe.date_range();
        self.fetch_range(symbol, start, end).await
    }

    /// Fetch daily history for an explicit date range
    pub async fn fetch_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<OhlcvSeries, FetchError> {
        let provider = yahoo::YahooConnector::new().map_err(|e| FetchError::Source {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let start_odt =
            OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
                FetchError::Source {
                    symbol: symbol.to_string(),
                    reason: format!("invalid start timestamp: {e}"),
                }
            })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(|e| {
            FetchError::Source {
                symbol: symbol.to_string(),
                reason: format!("invalid end timestamp: {e}"),
            }
        })?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| FetchError::Source {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let quotes = response.quotes().map_err(|e| FetchError::Source {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        if quotes.is_empty() {
            return Err(FetchError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let bars: Vec<Bar> = quotes
            .iter()
            .map(|q| Bar {
                date: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now)
                    .date_naive(),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect();

        info!(symbol, bars = bars.len(), "Fetched price history");

        let mut series = OhlcvSeries::new(symbol, bars);
        series.meta = self.fetch_profile(symbol).await;
        series.derived = Some(enrich(&series));
        Ok(series)
    }

    /// Fetch sector/industry/market-cap metadata for a symbol
    ///
    /// Metadata is best-effort: any failure leaves the fields empty rather
    /// than failing the price-history request.
    async fn fetch_profile(&self, symbol: &str) -> SeriesMeta {
        match self.request_profile(symbol).await {
            Ok(meta) => meta,
            Err(e) => {
                debug!(symbol, error = %e, "Profile unavailable, leaving metadata empty");
                SeriesMeta::default()
            }
        }
    }

    async fn request_profile(&self, symbol: &str) -> Result<SeriesMeta, reqwest::Error> {
        let response = self
            .http
            .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
            .query(&[("modules", "assetProfile,price")])
            .send()
            .await?
            .error_for_status()?;

        let body: QuoteSummaryResponse = response.json().await?;
        Ok(body.into_meta())
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Vec<QuoteSummaryResult>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

impl QuoteSummaryResponse {
    fn into_meta(self) -> SeriesMeta {
        let Some(result) = self.quote_summary.result.into_iter().next() else {
            return SeriesMeta::default();
        };
        let profile = result.asset_profile.unwrap_or_default();
        SeriesMeta {
            sector: profile.sector,
            industry: profile.industry,
            market_cap: result.price.and_then(|p| p.market_cap).and_then(|m| m.raw),
        }
    }
}

/// Compute the fetch-time enrichment columns for a series
fn enrich(series: &OhlcvSeries) -> DerivedColumns {
    let closes = series.closes();
    let volumes = series.volumes();

    // The rolling volatility column is built from fractional returns, not
    // the percent-scaled series the engine annualizes over
    let returns: Vec<f64> = crate::analysis::daily_returns_pct(&closes)
        .into_iter()
        .map(|r| r / 100.0)
        .collect();
    let volatility: Vec<f64> = rolling::rolling_std(&returns, VOLATILITY_WINDOW)
        .into_iter()
        .map(|v| v * TRADING_DAYS_PER_YEAR.sqrt())
        .collect();

    let value_traded: Vec<f64> = closes
        .iter()
        .zip(&volumes)
        .map(|(c, v)| c * v)
        .collect();

    DerivedColumns {
        sma_20: rolling::rolling_mean(&closes, SMA_SHORT_WINDOW),
        sma_50: rolling::rolling_mean(&closes, SMA_LONG_WINDOW),
        ema_12: rolling::ema_adjusted(&closes, EMA_FAST_SPAN),
        ema_26: rolling::ema_adjusted(&closes, EMA_SLOW_SPAN),
        volatility,
        avg_value_traded: rolling::rolling_mean(&value_traded, VALUE_TRADED_WINDOW),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series_of(closes: &[f64]) -> OhlcvSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100,
            })
            .collect();
        OhlcvSeries::new("TEST", bars)
    }

    #[test]
    fn test_enrich_column_alignment() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
        let derived = enrich(&series_of(&closes));

        assert_eq!(derived.sma_20.len(), 60);
        assert!(derived.sma_20[18].is_nan());
        assert!(derived.sma_20[19].is_finite());
        assert!(derived.sma_50[48].is_nan());
        assert!(derived.sma_50[49].is_finite());
        // Value traded needs 5 bars, volatility needs 20 returns (21 bars)
        assert!(derived.avg_value_traded[3].is_nan());
        assert!(derived.avg_value_traded[4].is_finite());
        assert!(derived.volatility[19].is_nan());
        assert!(derived.volatility[20].is_finite());
    }

    #[test]
    fn test_enrich_ema_spans_whole_series() {
        let closes = [10.0, 11.0, 12.0];
        let derived = enrich(&series_of(&closes));
        assert!(derived.ema_12.iter().all(|v| v.is_finite()));
        assert_eq!(derived.ema_12[0], 10.0);
        // Look-back-adjusted form: (x1 + decay * x0) / (1 + decay), decay = 11/13
        let decay: f64 = 11.0 / 13.0;
        let expected = (11.0 + decay * 10.0) / (1.0 + decay);
        assert!((derived.ema_12[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_enrich_volatility_uses_fractional_returns() {
        let closes: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 100.0 } else { 103.0 })
            .collect();
        let derived = enrich(&series_of(&closes));

        let fractional: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
        let tail = &fractional[fractional.len() - 20..];
        let expected = crate::rolling::sample_std(tail) * 252.0_f64.sqrt();
        assert!((derived.volatility[39] - expected).abs() < 1e-12);
        // Fractional scale: well under 1 for low-single-digit daily moves
        assert!(derived.volatility[39] < 1.0);
    }

    #[test]
    fn test_profile_response_parsing() {
        let json = r#"{"quoteSummary":{"result":[{
            "assetProfile":{"sector":"Technology","industry":"Consumer Electronics"},
            "price":{"marketCap":{"raw":2.5e12}}
        }],"error":null}}"#;
        let parsed: QuoteSummaryResponse = serde_json::from_str(json).expect("parses");
        let meta = parsed.into_meta();

        assert_eq!(meta.sector.as_deref(), Some("Technology"));
        assert_eq!(meta.industry.as_deref(), Some("Consumer Electronics"));
        assert_eq!(meta.market_cap, Some(2.5e12));
    }

    #[test]
    fn test_profile_response_without_modules_is_empty() {
        let json = r#"{"quoteSummary":{"result":[{}],"error":null}}"#;
        let parsed: QuoteSummaryResponse = serde_json::from_str(json).expect("parses");
        assert_eq!(parsed.into_meta(), SeriesMeta::default());

        let json = r#"{"quoteSummary":{"result":[],"error":null}}"#;
        let parsed: QuoteSummaryResponse = serde_json::from_str(json).expect("parses");
        assert_eq!(parsed.into_meta(), SeriesMeta::default());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_history() {
        let client = YahooClient::new();
        let series = client
            .fetch("AAPL", Timeframe::OneMonth)
            .await
            .expect("fetch succeeds");
        assert!(!series.is_empty());
        assert_eq!(series.symbol, "AAPL");
        assert!(series.derived.is_some());
    }
}
