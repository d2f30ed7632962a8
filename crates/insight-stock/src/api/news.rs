//! Yahoo Finance news client

use crate::error::Result;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const DEFAULT_RATE_LIMIT: u32 = 60;

/// A single news headline attached to a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

/// Rate-limited client for symbol news headlines
pub struct NewsClient {
    client: Client,
    rate_limiter: SharedRateLimiter,
}

impl NewsClient {
    /// Create a new news client
    ///
    /// # Arguments
    /// * `rate_limit` - Requests per minute against the news endpoint
    /// * `timeout` - Per-request timeout
    pub fn new(rate_limit: u32, timeout: Duration) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit)
                .unwrap_or_else(|| NonZeroU32::new(DEFAULT_RATE_LIMIT).expect("nonzero")),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            rate_limiter,
        }
    }

    /// Fetch recent news headlines for a symbol, deduplicated by title
    pub async fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>> {
        self.rate_limiter.until_ready().await;

        let news_count = limit.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", symbol),
                ("newsCount", news_count.as_str()),
                ("quotesCount", "0"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(dedup_by_title(body.news, limit))
    }
}

impl Default for NewsClient {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT, Duration::from_secs(30))
    }
}

fn dedup_by_title(items: Vec<RawNewsItem>, limit: usize) -> Vec<NewsItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter_map(|raw| {
            let title = raw.title?;
            if !seen.insert(title.clone()) {
                return None;
            }
            Some(NewsItem {
                title,
                link: raw.link.unwrap_or_else(|| "#".to_string()),
                publisher: raw.publisher,
            })
        })
        .take(limit)
        .collect()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<RawNewsItem>,
}

#[derive(Debug, Deserialize)]
struct RawNewsItem {
    title: Option<String>,
    link: Option<String>,
    publisher: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str) -> RawNewsItem {
        RawNewsItem {
            title: Some(title.to_string()),
            link: Some(format!("https://example.com/{title}")),
            publisher: Some("Yahoo Finance".to_string()),
        }
    }

    #[test]
    fn test_dedup_by_title() {
        let items = vec![raw("a"), raw("b"), raw("a"), raw("c")];
        let out = dedup_by_title(items, 5);
        let titles: Vec<&str> = out.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_respects_limit() {
        let items = vec![raw("a"), raw("b"), raw("c")];
        let out = dedup_by_title(items, 2);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_missing_title_skipped() {
        let items = vec![
            RawNewsItem {
                title: None,
                link: None,
                publisher: None,
            },
            raw("kept"),
        ];
        let out = dedup_by_title(items, 5);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "kept");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_news() {
        let client = NewsClient::default();
        let news = client.fetch_news("AAPL", 5).await.expect("fetch succeeds");
        assert!(news.len() <= 5);
    }
}
