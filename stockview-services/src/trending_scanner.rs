//! Trending Scanner
//!
//! Produces the trending penny-stock list. Social sentiment is tried first;
//! when it yields nothing the scanner relaxes to price-only movers under
//! progressively higher price ceilings. Results from a price tier are tagged
//! with the tier so consumers can tell them apart from genuine social data.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use stockview_core::{
    FallbackTier, MarketDataSource, Quote, QuoteMap, StockViewError, StockViewResult,
    TrendingResult, TrendingSnapshot,
};

use crate::batch_rotator::BatchRotator;
use crate::sentiment_aggregator::{SentimentAggregator, DEFAULT_WINDOW_DAYS};
use crate::trending_cache::TrendingCache;
use crate::universe::{to_owned_list, PENNY_TICKERS};

/// Rotated batches tried by the sub-$5 tier
pub const MAX_BATCH_TRIES: u64 = 4;

/// Price ceiling applied to sentiment results
const SENTIMENT_PRICE_CEILING: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct TrendingScannerConfig {
    /// Symbols per rotated batch
    pub batch_size: usize,
    /// Days of social data per symbol
    pub window_days: i64,
    /// Results kept per scan
    pub max_results: usize,
}

impl Default for TrendingScannerConfig {
    fn default() -> Self {
        Self {
            batch_size: 12,
            window_days: DEFAULT_WINDOW_DAYS,
            max_results: 10,
        }
    }
}

/// Rotated batch offsets scanned by a price tier
fn tier_offsets(tier: FallbackTier) -> Range<u64> {
    match tier {
        FallbackTier::Price5 => 0..MAX_BATCH_TRIES,
        FallbackTier::Price10 => MAX_BATCH_TRIES..MAX_BATCH_TRIES + 2,
        FallbackTier::Price20 => MAX_BATCH_TRIES + 2..MAX_BATCH_TRIES + 4,
    }
}

fn by_magnitude_desc(a: &TrendingResult, b: &TrendingResult) -> std::cmp::Ordering {
    b.change_percent.abs().total_cmp(&a.change_percent.abs())
}

pub struct TrendingScanner {
    source: Arc<dyn MarketDataSource>,
    sentiment: SentimentAggregator,
    rotator: BatchRotator,
    config: TrendingScannerConfig,
    cache: Option<Arc<dyn TrendingCache>>,
}

impl TrendingScanner {
    /// Scanner over the penny universe, without a cache
    pub fn new(source: Arc<dyn MarketDataSource>, config: TrendingScannerConfig) -> Self {
        Self::with_universe(source, config, to_owned_list(PENNY_TICKERS))
    }

    pub fn with_universe(
        source: Arc<dyn MarketDataSource>,
        config: TrendingScannerConfig,
        universe: Vec<String>,
    ) -> Self {
        Self {
            sentiment: SentimentAggregator::new(source.clone()),
            rotator: BatchRotator::new(universe, config.batch_size),
            source,
            config,
            cache: None,
        }
    }

    /// Attach a last-good cache used by [`TrendingScanner::refresh`]
    pub fn with_cache(mut self, cache: Arc<dyn TrendingCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &TrendingScannerConfig {
        &self.config
    }

    /// Scan and settle against the cache
    pub async fn refresh(&self) -> StockViewResult<TrendingSnapshot> {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        self.refresh_at(now_ms).await
    }

    pub async fn refresh_at(&self, now_ms: u64) -> StockViewResult<TrendingSnapshot> {
        let items = self.scan_at(now_ms).await?;
        Ok(self.settle(items))
    }

    fn settle(&self, items: Vec<TrendingResult>) -> TrendingSnapshot {
        if !items.is_empty() {
            if let Some(cache) = &self.cache {
                cache.set(&items);
            }
            return TrendingSnapshot {
                items,
                stale: false,
            };
        }

        match self.cache.as_ref().and_then(|cache| cache.get()) {
            Some(cached) if !cached.is_empty() => {
                info!("Trending scan empty, serving {} cached results", cached.len());
                TrendingSnapshot {
                    items: cached,
                    stale: true,
                }
            }
            _ => TrendingSnapshot::default(),
        }
    }

    /// Trending results for the current rotation window
    pub async fn scan(&self) -> StockViewResult<Vec<TrendingResult>> {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        self.scan_at(now_ms).await
    }

    /// Run the tiers in order and return the first non-empty one.
    ///
    /// An empty vector means every tier came back empty. Quotes fetched by
    /// one tier are reused by later tiers of the same scan.
    pub async fn scan_at(&self, now_ms: u64) -> StockViewResult<Vec<TrendingResult>> {
        let mut quoted = QuoteMap::new();

        let results =
            Self::settle_tier("sentiment", self.sentiment_tier(now_ms, &mut quoted).await)?;
        if !results.is_empty() {
            info!("Trending scan: {} results from social sentiment", results.len());
            return Ok(results);
        }

        for tier in [FallbackTier::Price5, FallbackTier::Price10, FallbackTier::Price20] {
            let results = Self::settle_tier(
                tier.label(),
                self.price_tier(tier, now_ms, &mut quoted).await,
            )?;
            if !results.is_empty() {
                info!(
                    "Trending scan: no sentiment data, {} results from {} tier",
                    results.len(),
                    tier.label()
                );
                return Ok(results);
            }
        }

        warn!("Trending scan: every tier came back empty");
        Ok(Vec::new())
    }

    /// Missing credentials abort the scan; any other tier failure counts as empty
    fn settle_tier(
        name: &str,
        result: StockViewResult<Vec<TrendingResult>>,
    ) -> StockViewResult<Vec<TrendingResult>> {
        match result {
            Ok(results) => Ok(results),
            Err(StockViewError::MissingCredential) => Err(StockViewError::MissingCredential),
            Err(e) => {
                warn!("Trending {} tier failed: {}", name, e);
                Ok(Vec::new())
            }
        }
    }

    /// Fetch quotes for symbols this scan has not quoted yet
    async fn quote_missing(&self, symbols: &[String], quoted: &mut QuoteMap) -> StockViewResult<()> {
        let missing: Vec<String> = symbols
            .iter()
            .filter(|symbol| !quoted.contains_key(*symbol))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        let fetched = self.source.quotes(&missing).await?;
        quoted.extend(fetched);
        Ok(())
    }

    async fn sentiment_tier(
        &self,
        now_ms: u64,
        quoted: &mut QuoteMap,
    ) -> StockViewResult<Vec<TrendingResult>> {
        let batch = self.rotator.select_batch_at(now_ms, 0);
        let records = self.sentiment.scan(&batch, self.config.window_days).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let symbols: Vec<String> = records.iter().map(|r| r.symbol.clone()).collect();
        self.quote_missing(&symbols, quoted).await?;

        let mut results: Vec<TrendingResult> = records
            .into_iter()
            .filter_map(|record| {
                let quote = quoted.get(&record.symbol).copied().flatten()?;
                if !quote.has_valid_price() || quote.price >= SENTIMENT_PRICE_CEILING {
                    return None;
                }
                // Social buzz stands on its own; an unknown move reads as flat
                let change_percent = quote.resolved_change_percent().unwrap_or(0.0);
                Some(TrendingResult::from_sentiment(record, &quote, change_percent))
            })
            .collect();

        results.sort_by(|a, b| b.hype_score.total_cmp(&a.hype_score));
        results.truncate(self.config.max_results);
        Ok(results)
    }

    async fn price_tier(
        &self,
        tier: FallbackTier,
        now_ms: u64,
        quoted: &mut QuoteMap,
    ) -> StockViewResult<Vec<TrendingResult>> {
        let ceiling = tier.price_ceiling();
        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::new();

        for offset in tier_offsets(tier) {
            if results.len() >= self.config.max_results {
                break;
            }

            let batch: Vec<String> = self
                .rotator
                .select_batch_at(now_ms, offset)
                .into_iter()
                .filter(|symbol| seen.insert(symbol.clone()))
                .collect();
            if batch.is_empty() {
                continue;
            }

            self.quote_missing(&batch, quoted).await?;
            for symbol in batch {
                let Some(quote) = quoted.get(&symbol).copied().flatten() else {
                    continue;
                };
                if !quote.has_valid_price() || quote.price >= ceiling {
                    continue;
                }
                let Some(change_percent) = Self::change_percent(&symbol, &quote) else {
                    continue;
                };
                results.push(TrendingResult::from_price_move(symbol, &quote, change_percent, tier));
            }
        }

        debug!("{} tier collected {} candidates", tier, results.len());
        results.sort_by(by_magnitude_desc);
        results.truncate(self.config.max_results);
        Ok(results)
    }

    fn change_percent(symbol: &str, quote: &Quote) -> Option<f64> {
        let resolved = quote.resolved_change_percent();
        if resolved.is_none() {
            debug!("Skipping {}: change percent cannot be resolved", symbol);
        }
        resolved
    }
}
