//! Candle series and resolutions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle resolution accepted by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1")]
    OneMinute,
    #[serde(rename = "5")]
    FiveMinutes,
    #[serde(rename = "15")]
    FifteenMinutes,
    #[serde(rename = "30")]
    ThirtyMinutes,
    #[serde(rename = "60")]
    SixtyMinutes,
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
}

impl Resolution {
    /// Wire value for the `resolution` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneMinute => "1",
            Resolution::FiveMinutes => "5",
            Resolution::FifteenMinutes => "15",
            Resolution::ThirtyMinutes => "30",
            Resolution::SixtyMinutes => "60",
            Resolution::Day => "D",
            Resolution::Week => "W",
            Resolution::Month => "M",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Resolution::OneMinute
                | Resolution::FiveMinutes
                | Resolution::FifteenMinutes
                | Resolution::ThirtyMinutes
                | Resolution::SixtyMinutes
        )
    }

    /// Lookback used when the caller gives no explicit range
    pub fn default_lookback(&self) -> Duration {
        match self {
            r if r.is_intraday() => Duration::hours(24),
            Resolution::Day => Duration::days(90),
            Resolution::Week => Duration::weeks(52),
            _ => Duration::days(365),
        }
    }

    /// Default `(from, to)` window in epoch seconds ending at `now`
    pub fn default_window(&self, now: DateTime<Utc>) -> (i64, i64) {
        let to = now.timestamp();
        (to - self.default_lookback().num_seconds(), to)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1" => Ok(Resolution::OneMinute),
            "5" => Ok(Resolution::FiveMinutes),
            "15" => Ok(Resolution::FifteenMinutes),
            "30" => Ok(Resolution::ThirtyMinutes),
            "60" => Ok(Resolution::SixtyMinutes),
            "D" => Ok(Resolution::Day),
            "W" => Ok(Resolution::Week),
            "M" => Ok(Resolution::Month),
            _ => Err(format!("Unknown resolution: {}", s)),
        }
    }
}

/// One close in a candle series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    /// Epoch seconds
    pub timestamp: i64,
    pub close: f64,
}

/// Ordered closes for a symbol/resolution pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub symbol: String,
    pub resolution: Resolution,
    pub points: Vec<CandlePoint>,
}

impl CandleSeries {
    pub fn empty(symbol: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            symbol: symbol.into(),
            resolution,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The last `n` points (or all of them if fewer)
    pub fn tail(&self, n: usize) -> &[CandlePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}
