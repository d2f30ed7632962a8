//! Run orchestration: single-symbol analysis and multi-symbol batches

use crate::analysis::{self, IndicatorBundle};
use crate::api::{NewsClient, NewsItem, YahooClient};
use crate::cache::InsightCache;
use crate::comparison::{self, ComparisonInput, ComparisonResult};
use crate::config::AppConfig;
use crate::error::{FetchError, Result, StockError};
use crate::prompt;
use crate::timeframe::Timeframe;
use insight_llm::InsightProvider;
use std::sync::Arc;
use tracing::warn;

/// Completed analysis for one symbol
#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub bundle: IndicatorBundle,
    pub closes: Vec<f64>,
    pub news: Vec<NewsItem>,
    pub insights: String,
}

/// Outcome of a multi-symbol run
///
/// Failures are isolated per symbol: a failed symbol is recorded here and the
/// rest of the batch proceeds. The comparison covers surviving symbols and is
/// present only when at least two survive.
#[derive(Debug)]
pub struct BatchOutcome {
    pub reports: Vec<SymbolReport>,
    pub failures: Vec<(String, StockError)>,
    pub comparison: Option<ComparisonResult>,
}

/// Stock insight application: wires the data source, indicator engine, news
/// client, insight cache, and AI provider together
pub struct StockInsight {
    config: AppConfig,
    provider: Arc<dyn InsightProvider>,
    cache: InsightCache,
    yahoo: YahooClient,
    news: NewsClient,
}

impl StockInsight {
    /// Create the application from configuration, constructing the provider
    /// from the registry
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config.resolve_api_key()?;
        let provider = insight_llm::providers::create(config.provider, api_key)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create the application with an explicit provider instance
    pub fn with_provider(config: AppConfig, provider: Arc<dyn InsightProvider>) -> Self {
        let cache = InsightCache::new(&config.cache_dir);
        let news = NewsClient::new(config.news_rate_limit, config.request_timeout);
        Self {
            config,
            provider,
            cache,
            yahoo: YahooClient::new(),
            news,
        }
    }

    /// Analyze a single symbol end to end
    pub async fn analyze(&self, symbol: &str, timeframe: Timeframe) -> Result<SymbolReport> {
        validate_symbol(symbol)?;

        let series = self.yahoo.fetch(symbol, timeframe).await?;
        series.validate().map_err(StockError::from)?;
        let bundle = analysis::compute(&series);

        // News degrades to empty rather than failing the request
        let news = match self.news.fetch_news(symbol, self.config.news_limit).await {
            Ok(items) => items,
            Err(e) => {
                warn!(symbol, error = %e, "Unable to fetch news");
                Vec::new()
            }
        };

        let insights = self.insights_for(symbol, timeframe, &bundle, &news).await?;

        Ok(SymbolReport {
            symbol: symbol.to_string(),
            timeframe,
            closes: series.closes(),
            bundle,
            news,
            insights,
        })
    }

    /// Generate insights for an already-computed bundle, consulting the cache
    ///
    /// A cache hit requires the stored record to match both the stringified
    /// analysis and the news list exactly.
    pub async fn insights_for(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bundle: &IndicatorBundle,
        news: &[NewsItem],
    ) -> Result<String> {
        let analysis_map = bundle.display_map();

        if let Some(cached) = self.cache.lookup(symbol, timeframe, &analysis_map, news) {
            return Ok(cached);
        }

        let prompt = prompt::build_insight_prompt(symbol, timeframe, bundle, news);
        let insights = self.provider.generate_insights(&prompt).await?;

        self.cache
            .store(symbol, timeframe, analysis_map, news.to_vec(), insights.clone())?;

        Ok(insights)
    }

    /// Analyze a batch of symbols with per-symbol failure isolation
    ///
    /// Symbols are independent and run concurrently. The comparison is built
    /// over surviving symbols when at least two remain.
    pub async fn analyze_many(&self, symbols: &[String], timeframe: Timeframe) -> BatchOutcome {
        let runs = symbols
            .iter()
            .map(|symbol| async move { (symbol.clone(), self.analyze(symbol, timeframe).await) });
        let results = futures::future::join_all(runs).await;

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for (symbol, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(symbol, error = %e, "Symbol failed, continuing batch");
                    failures.push((symbol, e));
                }
            }
        }

        let comparison = if reports.len() >= 2 {
            let inputs: Vec<ComparisonInput> = reports
                .iter()
                .map(|r| ComparisonInput {
                    symbol: r.symbol.clone(),
                    bundle: r.bundle.clone(),
                    closes: r.closes.clone(),
                })
                .collect();
            Some(comparison::compare(&inputs))
        } else {
            None
        };

        BatchOutcome {
            reports,
            failures,
            comparison,
        }
    }
}

/// Validate a stock symbol: alphabetic characters only
pub fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FetchError::InvalidSymbol(symbol.to_string()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute;
    use crate::series::{Bar, OhlcvSeries};
    use async_trait::async_trait;
    use chrono::{Days, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InsightProvider for CountingProvider {
        async fn generate_insights(&self, _prompt: &str) -> insight_llm::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("stub insights".to_string())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn sample_bundle() -> IndicatorBundle {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let bars = (0..30u32)
            .map(|i| {
                let close = 100.0 + f64::from(i);
                Bar {
                    date: start + Days::new(u64::from(i)),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000,
                }
            })
            .collect();
        compute(&OhlcvSeries::new("AAPL", bars))
    }

    #[test]
    fn test_validate_symbol() {
        assert!(validate_symbol("AAPL").is_ok());
        assert!(validate_symbol("msft").is_ok());
        assert!(validate_symbol("BRK.B").is_err());
        assert!(validate_symbol("123").is_err());
        assert!(validate_symbol("").is_err());
    }

    #[tokio::test]
    async fn test_insights_generated_once_then_cached() {
        let dir = TempDir::new().expect("temp dir");
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let config = AppConfig::builder()
            .api_key("unused")
            .cache_dir(dir.path())
            .build()
            .expect("valid config");
        let app = StockInsight::with_provider(config, provider.clone());

        let bundle = sample_bundle();
        let news = vec![NewsItem {
            title: "headline".to_string(),
            link: "#".to_string(),
            publisher: None,
        }];

        let first = app
            .insights_for("AAPL", Timeframe::OneMonth, &bundle, &news)
            .await
            .expect("insights");
        assert_eq!(first, "stub insights");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let second = app
            .insights_for("AAPL", Timeframe::OneMonth, &bundle, &news)
            .await
            .expect("insights");
        assert_eq!(second, "stub insights");
        // Served from cache, provider not called again
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_news_regenerates() {
        let dir = TempDir::new().expect("temp dir");
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let config = AppConfig::builder()
            .api_key("unused")
            .cache_dir(dir.path())
            .build()
            .expect("valid config");
        let app = StockInsight::with_provider(config, provider.clone());

        let bundle = sample_bundle();
        app.insights_for("AAPL", Timeframe::OneMonth, &bundle, &[])
            .await
            .expect("insights");

        let news = vec![NewsItem {
            title: "fresh".to_string(),
            link: "#".to_string(),
            publisher: None,
        }];
        app.insights_for("AAPL", Timeframe::OneMonth, &bundle, &news)
            .await
            .expect("insights");

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
