//! Sentiment Aggregator
//!
//! Reduces raw Reddit/Twitter mention series into per-symbol sentiment
//! ratios, a hype score and a bucketed mention history.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};

use stockview_core::{
    parse_time_key, MarketDataSource, MentionPoint, SentimentBreakdown, SentimentRecord,
    SocialMention, SocialSentiment, SourceMentions, StockViewError, StockViewResult,
};

/// Days of social data summed per symbol
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// History buckets kept per record
pub const MAX_HISTORY_POINTS: usize = 20;

/// Hype score above which a record is flagged as trending
pub const TRENDING_HYPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Default, Clone, Copy)]
struct MentionTotals {
    mentions: i64,
    positive: i64,
    negative: i64,
}

impl MentionTotals {
    fn sum(records: &[SocialMention]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            mentions: acc.mentions + r.mention.max(0),
            positive: acc.positive + r.positive_mention.max(0),
            negative: acc.negative + r.negative_mention.max(0),
        })
    }
}

/// Reduce one symbol's raw payload. Returns `None` when there are no mentions.
pub fn reduce_sentiment(symbol: &str, raw: &SocialSentiment) -> Option<SentimentRecord> {
    let reddit = MentionTotals::sum(&raw.reddit);
    let twitter = MentionTotals::sum(&raw.twitter);

    let total = reddit.mentions + twitter.mentions;
    if total <= 0 {
        return None;
    }

    // Clamp so the three buckets partition the total
    let positive = (reddit.positive + twitter.positive).min(total);
    let negative = (reddit.negative + twitter.negative).min(total - positive);
    let neutral = total - positive - negative;

    let total_f = total as f64;
    let positive_ratio = positive as f64 / total_f;
    let negative_ratio = negative as f64 / total_f;
    let neutral_ratio = neutral as f64 / total_f;

    let score = positive_ratio - negative_ratio;
    let hype_score = total_f * (1.0 + score.abs());

    Some(SentimentRecord {
        symbol: symbol.to_string(),
        mentions: total as u64,
        sentiment: SentimentBreakdown {
            positive: percent(positive_ratio),
            neutral: percent(neutral_ratio),
            negative: percent(negative_ratio),
            score,
        },
        hype_score,
        trending: hype_score > TRENDING_HYPE_THRESHOLD,
        sources: SourceMentions {
            reddit: reddit.mentions as u64,
            twitter: twitter.mentions as u64,
            stocktwits: 0,
        },
        mention_history: mention_history(raw),
    })
}

fn percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Mentions summed per time key across both sources, ascending, last 20 kept.
///
/// Records without a parseable key are dropped; nothing is interpolated.
fn mention_history(raw: &SocialSentiment) -> Vec<MentionPoint> {
    let mut buckets: BTreeMap<i64, u64> = BTreeMap::new();

    for record in raw.reddit.iter().chain(raw.twitter.iter()) {
        let Some(key) = record.time_key() else {
            continue;
        };
        match parse_time_key(key) {
            Some(time) => *buckets.entry(time).or_default() += record.mention.max(0) as u64,
            None => debug!("Ignoring unparseable mention time key '{}'", key),
        }
    }

    let skip = buckets.len().saturating_sub(MAX_HISTORY_POINTS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(time, mentions)| MentionPoint { time, mentions })
        .collect()
}

/// Fetches and reduces social sentiment for symbols
pub struct SentimentAggregator {
    source: Arc<dyn MarketDataSource>,
}

impl SentimentAggregator {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// Sentiment over the last `window_days`; `None` when the symbol has no mentions
    #[instrument(skip(self))]
    pub async fn aggregate(
        &self,
        symbol: &str,
        window_days: i64,
    ) -> StockViewResult<Option<SentimentRecord>> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(window_days);

        let raw = self.source.social_sentiment(symbol, from, to).await?;
        Ok(reduce_sentiment(symbol, &raw))
    }

    /// Aggregate a batch one symbol at a time.
    ///
    /// Per-symbol failures are logged and skipped; only a missing credential
    /// aborts the scan.
    pub async fn scan(
        &self,
        symbols: &[String],
        window_days: i64,
    ) -> StockViewResult<Vec<SentimentRecord>> {
        let mut records = Vec::new();

        for symbol in symbols {
            match self.aggregate(symbol, window_days).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!("No social mentions for {}", symbol),
                Err(StockViewError::MissingCredential) => {
                    return Err(StockViewError::MissingCredential)
                }
                Err(e) => warn!("Failed to fetch sentiment for {}: {}", symbol, e),
            }
        }

        debug!(
            "Sentiment scan produced {} records from {} symbols",
            records.len(),
            symbols.len()
        );
        Ok(records)
    }

    /// Raw payload for the last 24 hours, or `None` on failure
    pub async fn detailed(&self, symbol: &str) -> Option<SocialSentiment> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(1);

        match self.source.social_sentiment(symbol, from, to).await {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!("Could not fetch detailed sentiment for {}: {}", symbol, e);
                None
            }
        }
    }
}
