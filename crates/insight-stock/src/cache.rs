//! On-disk cache for generated insights
//!
//! Records are keyed by `{symbol}_{timeframe}` and store the stringified
//! analysis, the news list, and the generated insights. A hit requires exact
//! equality of both the analysis map and the news list against the stored
//! record; anything else (including a corrupt file) is a miss and the record
//! is regenerated. Read-then-conditionally-written with no locking; concurrent
//! requests for the same key may race.

use crate::api::NewsItem;
use crate::error::Result;
use crate::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A cached insight record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub analysis: BTreeMap<String, String>,
    pub news: Vec<NewsItem>,
    pub insights: String,
}

/// File-backed insight cache
pub struct InsightCache {
    dir: PathBuf,
}

impl InsightCache {
    /// Create a cache rooted at the given directory
    ///
    /// The directory is created lazily on the first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.dir.join(format!("{symbol}_{timeframe}.json"))
    }

    /// Look up cached insights for a symbol/timeframe
    ///
    /// Returns the stored insights only when both the analysis map and the
    /// news list match the stored record exactly.
    pub fn lookup(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        analysis: &BTreeMap<String, String>,
        news: &[NewsItem],
    ) -> Option<String> {
        let path = self.record_path(symbol, timeframe);
        let contents = fs::read_to_string(&path).ok()?;

        let record: CacheRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                // Corrupt record: regenerate rather than fail
                debug!(path = %path.display(), error = %e, "Ignoring unreadable cache record");
                return None;
            }
        };

        if &record.analysis == analysis && record.news == news {
            debug!(symbol, %timeframe, "Insight cache hit");
            Some(record.insights)
        } else {
            debug!(symbol, %timeframe, "Insight cache stale");
            None
        }
    }

    /// Store an insight record, replacing any existing one for the key
    pub fn store(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        analysis: BTreeMap<String, String>,
        news: Vec<NewsItem>,
        insights: String,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let record = CacheRecord {
            analysis,
            news,
            insights,
        };
        let path = self.record_path(symbol, timeframe);
        fs::write(&path, serde_json::to_string(&record)?)?;
        debug!(symbol, %timeframe, path = %path.display(), "Stored insight record");
        Ok(())
    }
}
