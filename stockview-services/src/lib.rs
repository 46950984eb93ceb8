//! Business logic services for StockView
//!
//! This crate turns raw market data from a [`stockview_core::MarketDataSource`]
//! into the trending, top movers and news feeds, and keeps them fresh with
//! backoff-aware background pollers.

pub mod backoff_poller;
pub mod batch_rotator;
pub mod data_status;
pub mod news_aggregator;
pub mod sentiment_aggregator;
pub mod top_movers;
pub mod trending_cache;
pub mod trending_scanner;
pub mod universe;

#[cfg(test)]
mod test_support;

pub use backoff_poller::{BackoffPoller, PollerConfig, PollerHandle};
pub use batch_rotator::{BatchRotator, ROTATION_PERIOD};
pub use data_status::{probe_data_status, DataStatus};
pub use news_aggregator::{analyze_sentiment, NewsAggregator, NewsAggregatorConfig};
pub use sentiment_aggregator::{reduce_sentiment, SentimentAggregator, DEFAULT_WINDOW_DAYS};
pub use top_movers::{rank_quotes, TopMoversAggregator, TopMoversConfig};
pub use trending_cache::{FileTrendingCache, MemoryTrendingCache, TrendingCache};
pub use trending_scanner::{TrendingScanner, TrendingScannerConfig, MAX_BATCH_TRIES};
