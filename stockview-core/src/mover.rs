//! Top mover records and sparklines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which end of the ranking to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoverDirection {
    Gainers,
    Losers,
}

impl fmt::Display for MoverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoverDirection::Gainers => f.write_str("gainers"),
            MoverDirection::Losers => f.write_str("losers"),
        }
    }
}

/// Provenance of a sparkline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparklineSource {
    /// Real 5-minute closes
    Candles,
    /// Linear interpolation from previous close to price
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparklinePoint {
    /// Epoch milliseconds
    pub time: i64,
    pub price: f64,
}

/// Short price trend shown next to a mover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    pub source: SparklineSource,
    pub points: Vec<SparklinePoint>,
}

impl Sparkline {
    pub fn is_synthetic(&self) -> bool {
        self.source == SparklineSource::Synthetic
    }
}

/// A ranked large-cap stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoverRecord {
    pub ticker: String,
    pub company_name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub previous_close: f64,
    pub day_high: f64,
    pub day_low: f64,
    /// Only the top few records of a ranking carry a sparkline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparkline: Option<Sparkline>,
    pub last_updated: DateTime<Utc>,
}

/// Gainers and losers from a single quote pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoversSnapshot {
    pub gainers: Vec<MoverRecord>,
    pub losers: Vec<MoverRecord>,
}

impl MoversSnapshot {
    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty()
    }
}
