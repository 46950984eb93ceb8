//! StockView runner
//!
//! Polls the trending, top movers and news feeds from Finnhub and logs every
//! update until interrupted.

mod config;

use std::sync::Arc;

use stockview_core::{
    MarketDataSource, MoversSnapshot, NewsSnapshot, PollPhase, PollState, StockViewError,
    TrendingSnapshot,
};
use stockview_finnhub::{FinnhubClient, FinnhubConfig};
use stockview_services::{
    probe_data_status, BackoffPoller, FileTrendingCache, MemoryTrendingCache, NewsAggregator,
    NewsAggregatorConfig, PollerConfig, TopMoversAggregator, TopMoversConfig, TrendingCache,
    TrendingScanner, TrendingScannerConfig,
};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::RunnerConfig;

/// Log each settled poll state until the poller stops
async fn log_updates<T, D>(name: &'static str, mut rx: watch::Receiver<PollState<T>>, describe: D)
where
    T: Clone + Send + Sync + 'static,
    D: Fn(&T) -> String + Send + 'static,
{
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if state.phase == PollPhase::Fetching {
            continue;
        }
        match (&state.last_error, &state.last_good_result) {
            (Some(error), _) => warn!(
                "{}: {} (next attempt in {}s)",
                name,
                error,
                state.current_delay_ms / 1000
            ),
            (None, Some(result)) => info!("{}: {}", name, describe(result)),
            (None, None) => {}
        }
    }
}

fn describe_trending(snapshot: &TrendingSnapshot) -> String {
    let symbols: Vec<String> = snapshot
        .items
        .iter()
        .map(|r| match r.fallback {
            Some(tier) => format!("{} {:+.2}% [{}]", r.symbol, r.change_percent, tier),
            None => format!("{} hype {:.0}", r.symbol, r.hype_score),
        })
        .collect();
    let stale = if snapshot.stale { " (cached)" } else { "" };
    format!("{} results{}: {}", snapshot.items.len(), stale, symbols.join(", "))
}

fn describe_movers(snapshot: &MoversSnapshot) -> String {
    let top = |records: &[stockview_core::MoverRecord]| {
        records
            .iter()
            .take(3)
            .map(|r| format!("{} {:+.2}%", r.ticker, r.change_percent))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "gainers [{}] losers [{}]",
        top(&snapshot.gainers),
        top(&snapshot.losers)
    )
}

fn describe_news(snapshot: &NewsSnapshot) -> String {
    let latest = snapshot
        .major
        .first()
        .map(|a| format!(" latest: {}", a.headline))
        .unwrap_or_default();
    format!(
        "{} major, {} penny articles{}",
        snapshot.major.len(),
        snapshot.penny.len(),
        latest
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,stockview_runner=debug,stockview_services=debug")
        }))
        .init();

    info!("Starting StockView");

    let finnhub_config = FinnhubConfig::from_env();
    if !finnhub_config.has_api_key() {
        warn!("No FINNHUB_API_KEY found - every feed will report a missing key");
    }
    let client = FinnhubClient::new(finnhub_config)?;
    let source: Arc<dyn MarketDataSource> = Arc::new(client);

    let status = probe_data_status(source.as_ref()).await;
    info!("Data status: {}", serde_json::to_string(&status)?);

    let config = RunnerConfig::from_env();
    info!("Runner configuration: {:?}", config);

    let cache: Arc<dyn TrendingCache> = match &config.cache_path {
        Some(path) => Arc::new(FileTrendingCache::new(path)),
        None => Arc::new(MemoryTrendingCache::new()),
    };

    let scanner = Arc::new(
        TrendingScanner::new(source.clone(), TrendingScannerConfig::default()).with_cache(cache),
    );
    let trending = BackoffPoller::spawn(
        "trending",
        PollerConfig::from_secs(config.trending_interval_secs),
        move || {
            let scanner = scanner.clone();
            async move { scanner.refresh().await }
        },
        StockViewError::is_rate_limited,
    );

    let movers_aggregator = Arc::new(TopMoversAggregator::new(
        source.clone(),
        TopMoversConfig::default(),
    ));
    let movers = BackoffPoller::spawn(
        "movers",
        PollerConfig::from_secs(config.movers_interval_secs),
        move || {
            let aggregator = movers_aggregator.clone();
            async move { aggregator.snapshot().await }
        },
        StockViewError::is_rate_limited,
    );

    let news_aggregator = Arc::new(NewsAggregator::new(
        source.clone(),
        NewsAggregatorConfig {
            breaking_only: config.news_breaking_only,
            ..NewsAggregatorConfig::default()
        },
    ));
    let news = BackoffPoller::spawn(
        "news",
        PollerConfig::from_secs(config.news_interval_secs),
        move || {
            let aggregator = news_aggregator.clone();
            async move { aggregator.snapshot().await }
        },
        StockViewError::is_rate_limited,
    );

    tokio::spawn(log_updates("trending", trending.subscribe(), describe_trending));
    tokio::spawn(log_updates("movers", movers.subscribe(), describe_movers));
    tokio::spawn(log_updates("news", news.subscribe(), describe_news));

    info!("Pollers running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    trending.shutdown().await;
    movers.shutdown().await;
    news.shutdown().await;

    Ok(())
}
