//! Core types for StockView
//!
//! This crate defines the shared data structures used across the workspace:
//! quotes, candles, social sentiment, trending and mover view-models, news,
//! poller state, and the [`MarketDataSource`] abstraction over the provider.

pub mod candle;
pub mod error;
pub mod mover;
pub mod news;
pub mod poll;
pub mod quote;
pub mod sentiment;
pub mod source;
pub mod symbol;
pub mod trending;

pub use candle::{CandlePoint, CandleSeries, Resolution};
pub use error::{StockViewError, StockViewResult};
pub use mover::{MoverDirection, MoverRecord, MoversSnapshot, Sparkline, SparklinePoint, SparklineSource};
pub use news::{NewsArticle, NewsCategory, NewsSentiment, NewsSnapshot, RawNewsItem, MARKET_TICKER};
pub use poll::{PollPhase, PollState, MAX_BACKOFF_MS};
pub use quote::{Quote, QuoteMap};
pub use sentiment::{
    parse_time_key, MentionPoint, SentimentBreakdown, SentimentRecord, SocialMention,
    SocialSentiment, SourceMentions,
};
pub use source::MarketDataSource;
pub use symbol::{filter_listed_symbols, ListedSymbol, SymbolMatch};
pub use trending::{FallbackTier, TrendingResult, TrendingSnapshot};
