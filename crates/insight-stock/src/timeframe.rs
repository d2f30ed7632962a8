//! Analysis timeframes and their date-range arithmetic

use crate::error::StockError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported analysis timeframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Timeframe {
    /// Calendar days covered by this timeframe
    pub fn days(self) -> i64 {
        match self {
            Self::OneDay => 1,
            Self::FiveDays => 5,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    /// Canonical string form, used in cache keys and display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
        }
    }

    /// Start/end instants for a request issued now
    pub fn date_range(self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = Utc::now();
        (end - Duration::days(self.days()), end)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Self::OneDay),
            "5d" => Ok(Self::FiveDays),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            other => Err(StockError::InvalidTimeframe(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for tf in ["1d", "5d", "1mo", "3mo", "6mo", "1y"] {
            let parsed: Timeframe = tf.parse().expect("valid timeframe");
            assert_eq!(parsed.as_str(), tf);
        }
        assert!("2w".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_date_range_span() {
        let (start, end) = Timeframe::ThreeMonths.date_range();
        assert_eq!((end - start).num_days(), 90);
    }
}
