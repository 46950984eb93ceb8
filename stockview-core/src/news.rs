//! News data structures for market news aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Decode an explicit `null` as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A news article as returned by the provider's news endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNewsItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    /// Publication time in epoch seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub datetime: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Comma-separated related symbols
    #[serde(default)]
    pub related: Option<String>,
}

/// Keyword-derived tone of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// Ticker group a news feed follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    /// Large caps and index ETFs
    Major,
    /// Low-priced, high-volatility names
    Penny,
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsCategory::Major => f.write_str("major"),
            NewsCategory::Penny => f.write_str("penny"),
        }
    }
}

/// Ticker assigned to general market news
pub const MARKET_TICKER: &str = "MARKET";

/// A normalized news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Unique within a feed: `{ticker}_{provider id}`
    pub id: String,
    /// Symbol, or [`MARKET_TICKER`] for general news
    pub ticker: String,
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: NewsSentiment,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Both news feeds from one poll
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSnapshot {
    pub major: Vec<NewsArticle>,
    pub penny: Vec<NewsArticle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_text_fields_decode_as_empty() {
        let feed = r#"[
            {"id": 1, "datetime": 1700000000, "headline": "Stocks rally", "summary": "Broad gains", "source": "Reuters", "url": "https://news.test/1"},
            {"id": 2, "datetime": null, "headline": "Chip rout", "summary": null, "source": null, "url": null, "image": null}
        ]"#;

        let items: Vec<RawNewsItem> = serde_json::from_str(feed).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].summary, "Broad gains");
        assert_eq!(items[1].headline, "Chip rout");
        assert_eq!(items[1].summary, "");
        assert_eq!(items[1].source, "");
        assert_eq!(items[1].datetime, 0);
        assert_eq!(items[1].image, None);
    }

    #[test]
    fn test_missing_fields_decode_as_default() {
        let item: RawNewsItem = serde_json::from_str(r#"{"headline": "Only a headline"}"#).unwrap();
        assert_eq!(item.headline, "Only a headline");
        assert_eq!(item.id, None);
        assert!(item.url.is_empty());
    }
}
