//! News Aggregator Service
//!
//! Merges general market news with company news for a category's tickers,
//! tags each article with a keyword sentiment and picks out breaking items.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, info, instrument, warn};

use stockview_core::{
    MarketDataSource, NewsArticle, NewsCategory, NewsSentiment, NewsSnapshot, RawNewsItem,
    StockViewError, StockViewResult, MARKET_TICKER,
};

use crate::universe::{MAJOR_NEWS_TICKERS, PENNY_NEWS_TICKERS};

const BULLISH_KEYWORDS: &[&str] = &[
    "surge", "record", "growth", "partnership", "breakthrough", "exceeds", "beats", "strong",
    "positive", "gains",
];

const BEARISH_KEYWORDS: &[&str] = &[
    "decline", "drop", "loss", "weak", "disappoints", "falls", "cuts", "reduces", "challenges",
    "concerns",
];

const BREAKING_KEYWORDS: &[&str] = &[
    "earnings", "merger", "acquisition", "breakthrough", "partnership", "record", "surge", "jump",
    "announces", "reports", "launches",
];

/// General news articles kept per fetch
const GENERAL_NEWS_COUNT: usize = 10;
/// Category tickers queried for company news
const COMPANY_NEWS_TICKERS: usize = 5;
const COMPANY_NEWS_PER_TICKER: usize = 3;
const COMPANY_NEWS_LOOKBACK_DAYS: i64 = 7;

/// Articles scanned when looking for breaking news
const BREAKING_CANDIDATES: usize = 50;
const BREAKING_WINDOW_HOURS: i64 = 4;
const MAX_BREAKING: usize = 10;

/// Configuration for NewsAggregator
#[derive(Debug, Clone)]
pub struct NewsAggregatorConfig {
    /// Articles kept per category
    pub limit: usize,
    /// Only publish breaking articles
    pub breaking_only: bool,
}

impl Default for NewsAggregatorConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            breaking_only: false,
        }
    }
}

/// Keyword sentiment: more bullish than bearish keywords is bullish, and
/// vice versa. Each keyword counts once.
pub fn analyze_sentiment(text: &str) -> NewsSentiment {
    let lower = text.to_lowercase();
    let bullish = BULLISH_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    let bearish = BEARISH_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();

    match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => NewsSentiment::Bullish,
        std::cmp::Ordering::Less => NewsSentiment::Bearish,
        std::cmp::Ordering::Equal => NewsSentiment::Neutral,
    }
}

fn is_breaking_text(article: &NewsArticle) -> bool {
    let headline = article.headline.to_lowercase();
    let summary = article.summary.to_lowercase();
    BREAKING_KEYWORDS
        .iter()
        .any(|k| headline.contains(k) || summary.contains(k))
}

/// Articles newer than four hours before `now` that mention a breaking keyword
pub fn filter_breaking(articles: Vec<NewsArticle>, now: DateTime<Utc>) -> Vec<NewsArticle> {
    let cutoff = now - Duration::hours(BREAKING_WINDOW_HOURS);
    articles
        .into_iter()
        .filter(|a| a.published_at > cutoff && is_breaking_text(a))
        .take(MAX_BREAKING)
        .collect()
}

fn tickers_for(category: NewsCategory) -> &'static [&'static str] {
    match category {
        NewsCategory::Major => MAJOR_NEWS_TICKERS,
        NewsCategory::Penny => PENNY_NEWS_TICKERS,
    }
}

/// Normalize a provider item under `ticker`
fn to_article(ticker: &str, index: usize, item: RawNewsItem) -> NewsArticle {
    let id = match item.id {
        Some(id) => format!("{}_{}", ticker, id),
        None => format!("{}_{}_{}", ticker, item.datetime, index),
    };
    let summary = if item.summary.trim().is_empty() {
        item.headline.clone()
    } else {
        item.summary
    };
    let published_at = Utc
        .timestamp_opt(item.datetime, 0)
        .single()
        .unwrap_or_default();
    let sentiment = analyze_sentiment(&format!("{} {}", item.headline, summary));

    NewsArticle {
        id,
        ticker: ticker.to_string(),
        headline: item.headline,
        summary,
        source: item.source,
        published_at,
        sentiment,
        url: item.url,
        thumbnail: item.image.filter(|url| !url.is_empty()),
    }
}

pub struct NewsAggregator {
    source: Arc<dyn MarketDataSource>,
    config: NewsAggregatorConfig,
}

impl NewsAggregator {
    pub fn new(source: Arc<dyn MarketDataSource>, config: NewsAggregatorConfig) -> Self {
        info!("Initializing NewsAggregator");
        Self { source, config }
    }

    pub fn config(&self) -> &NewsAggregatorConfig {
        &self.config
    }

    /// General plus company news for a category, newest first.
    ///
    /// The general news request must succeed; company news failures are
    /// logged and skipped.
    #[instrument(skip(self))]
    pub async fn fetch_stock_news(
        &self,
        category: NewsCategory,
        limit: usize,
    ) -> StockViewResult<Vec<NewsArticle>> {
        let general = self.source.market_news("general", 0).await?;

        let mut articles: Vec<NewsArticle> = Vec::new();
        let to = Utc::now().date_naive();
        let from = to - Duration::days(COMPANY_NEWS_LOOKBACK_DAYS);

        for ticker in tickers_for(category).iter().take(COMPANY_NEWS_TICKERS) {
            match self.source.company_news(ticker, from, to).await {
                Ok(items) => articles.extend(
                    items
                        .into_iter()
                        .take(COMPANY_NEWS_PER_TICKER)
                        .enumerate()
                        .map(|(i, item)| to_article(ticker, i, item)),
                ),
                Err(StockViewError::MissingCredential) => {
                    return Err(StockViewError::MissingCredential)
                }
                Err(e) => warn!("Failed to fetch news for {}: {}", ticker, e),
            }
        }

        articles.extend(
            general
                .into_iter()
                .take(GENERAL_NEWS_COUNT)
                .enumerate()
                .map(|(i, item)| to_article(MARKET_TICKER, i, item)),
        );

        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        debug!("Fetched {} {} news articles", articles.len(), category);
        Ok(articles)
    }

    /// High-impact articles from the last four hours
    pub async fn fetch_breaking_news(
        &self,
        category: NewsCategory,
    ) -> StockViewResult<Vec<NewsArticle>> {
        let articles = self.fetch_stock_news(category, BREAKING_CANDIDATES).await?;
        Ok(filter_breaking(articles, Utc::now()))
    }

    /// Both categories, as published by the news poller
    pub async fn snapshot(&self) -> StockViewResult<NewsSnapshot> {
        let (major, penny) = if self.config.breaking_only {
            (
                self.fetch_breaking_news(NewsCategory::Major).await?,
                self.fetch_breaking_news(NewsCategory::Penny).await?,
            )
        } else {
            (
                self.fetch_stock_news(NewsCategory::Major, self.config.limit).await?,
                self.fetch_stock_news(NewsCategory::Penny, self.config.limit).await?,
            )
        };

        info!("News refreshed: {} major, {} penny", major.len(), penny.len());
        Ok(NewsSnapshot { major, penny })
    }
}
