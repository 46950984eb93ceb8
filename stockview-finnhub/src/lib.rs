//! Finnhub integration for StockView
//!
//! This crate provides a rate-limited client for the Finnhub REST API
//! (quotes, candles, symbol search, news and social sentiment) that
//! implements [`stockview_core::MarketDataSource`].

pub mod client;
pub mod config;
pub mod rate_limiter;
pub mod types;

pub use client::FinnhubClient;
pub use config::{FinnhubConfig, FINNHUB_API_BASE};
pub use rate_limiter::{RateLimiter, RateLimiterStats, FINNHUB_MIN_REQUEST_INTERVAL_MS};
