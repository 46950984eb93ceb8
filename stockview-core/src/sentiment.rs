//! Social sentiment payloads and the reduced per-symbol record

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bucket of social mentions as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMention {
    #[serde(default)]
    pub mention: i64,
    #[serde(default)]
    pub positive_mention: i64,
    #[serde(default)]
    pub negative_mention: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl SocialMention {
    /// Bucket key: `atTime`, else `date`, else `time`
    pub fn time_key(&self) -> Option<&str> {
        [&self.at_time, &self.date, &self.time]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|k| !k.is_empty())
    }
}

/// Raw social sentiment response for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialSentiment {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub reddit: Vec<SocialMention>,
    #[serde(default)]
    pub twitter: Vec<SocialMention>,
}

/// Percent split of mentions plus the signed score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u8,
    pub neutral: u8,
    pub negative: u8,
    /// `positive_ratio - negative_ratio`, in [-1, 1]
    pub score: f64,
}

/// Mentions per source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMentions {
    pub reddit: u64,
    pub twitter: u64,
    pub stocktwits: u64,
}

/// Mentions summed over one time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionPoint {
    /// Epoch milliseconds
    pub time: i64,
    pub mentions: u64,
}

/// Reduced social sentiment for a symbol over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRecord {
    pub symbol: String,
    pub mentions: u64,
    pub sentiment: SentimentBreakdown,
    pub hype_score: f64,
    pub trending: bool,
    pub sources: SourceMentions,
    pub mention_history: Vec<MentionPoint>,
}

/// Parse a provider time key into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD`; naive values are read as UTC.
pub fn parse_time_key(key: &str) -> Option<i64> {
    let key = key.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(key) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(key, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_payload() {
        let json = r#"{
            "symbol": "GME",
            "reddit": [{"atTime": "2024-03-01 10:00:00", "mention": 12, "positiveMention": 8, "negativeMention": 2, "score": 0.4}],
            "twitter": []
        }"#;
        let parsed: SocialSentiment = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.reddit.len(), 1);
        assert_eq!(parsed.reddit[0].positive_mention, 8);
        assert_eq!(parsed.reddit[0].time_key(), Some("2024-03-01 10:00:00"));
    }

    #[test]
    fn test_time_key_precedence() {
        let mention = SocialMention {
            at_time: Some(String::new()),
            date: Some("2024-03-02".to_string()),
            time: Some("2024-03-03".to_string()),
            ..Default::default()
        };
        assert_eq!(mention.time_key(), Some("2024-03-02"));
        assert_eq!(SocialMention::default().time_key(), None);
    }

    #[test]
    fn test_parse_time_key_formats() {
        let expected = 1_709_287_200_000; // 2024-03-01T10:00:00Z
        assert_eq!(parse_time_key("2024-03-01 10:00:00"), Some(expected));
        assert_eq!(parse_time_key("2024-03-01T10:00:00"), Some(expected));
        assert_eq!(parse_time_key("2024-03-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_time_key("2024-03-01"), Some(expected - 10 * 3_600_000));
        assert_eq!(parse_time_key("yesterday"), None);
    }
}
