//! Trending scan results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sentiment::{MentionPoint, SentimentBreakdown, SentimentRecord, SourceMentions};
use crate::Quote;

/// Degraded tier that produced a trending result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackTier {
    /// Sub-$5 price movers
    Price5,
    /// Sub-$10 price movers
    Price10,
    /// Sub-$20 price movers
    Price20,
}

impl FallbackTier {
    /// Exclusive upper price bound of the tier
    pub fn price_ceiling(&self) -> f64 {
        match self {
            FallbackTier::Price5 => 5.0,
            FallbackTier::Price10 => 10.0,
            FallbackTier::Price20 => 20.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FallbackTier::Price5 => "sub-$5 price",
            FallbackTier::Price10 => "sub-$10 price",
            FallbackTier::Price20 => "sub-$20 price",
        }
    }
}

impl fmt::Display for FallbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackTier::Price5 => "price5",
            FallbackTier::Price10 => "price10",
            FallbackTier::Price20 => "price20",
        };
        f.write_str(s)
    }
}

/// A sentiment record merged with its quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResult {
    pub symbol: String,
    pub mentions: u64,
    pub sentiment: SentimentBreakdown,
    pub hype_score: f64,
    pub trending: bool,
    pub sources: SourceMentions,
    pub mention_history: Vec<MentionPoint>,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub last_updated: DateTime<Utc>,
    /// Set when a price tier produced this result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackTier>,
}

impl TrendingResult {
    /// Merge a genuine sentiment record with its quote
    pub fn from_sentiment(record: SentimentRecord, quote: &Quote, change_percent: f64) -> Self {
        Self {
            symbol: record.symbol,
            mentions: record.mentions,
            sentiment: record.sentiment,
            hype_score: record.hype_score,
            trending: record.trending,
            sources: record.sources,
            mention_history: record.mention_history,
            price: quote.price,
            change: quote.change,
            change_percent,
            last_updated: Utc::now(),
            fallback: None,
        }
    }

    /// Price-only result for a fallback tier. Carries no social signal.
    pub fn from_price_move(
        symbol: impl Into<String>,
        quote: &Quote,
        change_percent: f64,
        tier: FallbackTier,
    ) -> Self {
        let magnitude = change_percent.abs();
        Self {
            symbol: symbol.into(),
            mentions: 0,
            sentiment: SentimentBreakdown::default(),
            hype_score: (magnitude * 10.0).round(),
            trending: magnitude >= 2.0,
            sources: SourceMentions::default(),
            mention_history: Vec::new(),
            price: quote.price,
            change: quote.change,
            change_percent,
            last_updated: Utc::now(),
            fallback: Some(tier),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Result of one trending refresh, as handed to subscribers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingSnapshot {
    pub items: Vec<TrendingResult>,
    /// True when `items` came from the last-good cache
    pub stale: bool,
}
