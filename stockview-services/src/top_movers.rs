//! Top Movers Aggregator
//!
//! Ranks the large-cap universe by percent change and attaches intraday
//! sparklines to the leaders.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};

use stockview_core::{
    CandleSeries, MarketDataSource, MoverDirection, MoverRecord, MoversSnapshot, QuoteMap,
    Resolution, Sparkline, SparklinePoint, SparklineSource, StockViewResult,
};

use crate::universe::{company_name, to_owned_list, LARGE_CAP_TICKERS};

/// Spacing of synthetic sparkline points (5 minutes)
const SPARKLINE_STEP_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone)]
pub struct TopMoversConfig {
    /// Records kept per direction
    pub max_results: usize,
    /// Leading records per list that get a sparkline
    pub sparkline_count: usize,
    pub sparkline_points: usize,
}

impl Default for TopMoversConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            sparkline_count: 5,
            sparkline_points: 20,
        }
    }
}

/// Turn a quote batch into ranked mover records.
///
/// Missing or non-positive prices are dropped. An unresolvable change
/// percent ranks as 0.
pub fn rank_quotes(
    quotes: &QuoteMap,
    direction: MoverDirection,
    max_results: usize,
) -> Vec<MoverRecord> {
    let now = Utc::now();

    let mut records: Vec<MoverRecord> = quotes
        .iter()
        .filter_map(|(ticker, quote)| {
            let quote = quote.as_ref()?;
            if !quote.has_valid_price() {
                return None;
            }
            let change = if quote.change.is_finite() { quote.change } else { 0.0 };
            let change_percent = quote.resolved_change_percent().unwrap_or(0.0);

            Some(MoverRecord {
                ticker: ticker.clone(),
                company_name: company_name(ticker).to_string(),
                price: quote.price,
                change,
                change_percent,
                volume: quote.volume(),
                market_cap: quote.market_cap(),
                previous_close: quote.price - change,
                day_high: quote.day_high(),
                day_low: quote.day_low(),
                sparkline: None,
                last_updated: now,
            })
        })
        .collect();

    match direction {
        MoverDirection::Gainers => {
            records.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent))
        }
        MoverDirection::Losers => {
            records.sort_by(|a, b| a.change_percent.total_cmp(&b.change_percent))
        }
    }
    records.truncate(max_results);
    records
}

/// Last `points` closes of a candle series, `None` when it has no data
pub fn candle_sparkline(series: &CandleSeries, points: usize) -> Option<Sparkline> {
    if series.is_empty() {
        return None;
    }
    let points = series
        .tail(points)
        .iter()
        .map(|candle| SparklinePoint {
            time: candle.timestamp * 1000,
            price: candle.close,
        })
        .collect();
    Some(Sparkline {
        source: SparklineSource::Candles,
        points,
    })
}

/// Straight line from the previous close to the current price, one point
/// every 5 minutes up to `now_ms`
pub fn synthetic_sparkline(previous_close: f64, price: f64, now_ms: i64, count: usize) -> Sparkline {
    let steps = count.saturating_sub(1).max(1) as f64;
    let points = (0..count)
        .map(|i| SparklinePoint {
            time: now_ms - (count - i) as i64 * SPARKLINE_STEP_MS,
            price: previous_close + (price - previous_close) * (i as f64 / steps),
        })
        .collect();
    Sparkline {
        source: SparklineSource::Synthetic,
        points,
    }
}

pub struct TopMoversAggregator {
    source: Arc<dyn MarketDataSource>,
    universe: Vec<String>,
    config: TopMoversConfig,
}

impl TopMoversAggregator {
    pub fn new(source: Arc<dyn MarketDataSource>, config: TopMoversConfig) -> Self {
        Self::with_universe(source, config, to_owned_list(LARGE_CAP_TICKERS))
    }

    pub fn with_universe(
        source: Arc<dyn MarketDataSource>,
        config: TopMoversConfig,
        universe: Vec<String>,
    ) -> Self {
        Self {
            source,
            universe,
            config,
        }
    }

    /// Ranked movers in one direction, leaders with sparklines
    #[instrument(skip(self))]
    pub async fn rank(&self, direction: MoverDirection) -> StockViewResult<Vec<MoverRecord>> {
        let quotes = self.source.quotes(&self.universe).await?;
        let mut records = rank_quotes(&quotes, direction, self.config.max_results);

        let mut loaded = HashMap::new();
        self.attach_sparklines(&mut records, &mut loaded).await;
        Ok(records)
    }

    /// Both directions from a single quote batch
    pub async fn snapshot(&self) -> StockViewResult<MoversSnapshot> {
        let quotes = self.source.quotes(&self.universe).await?;
        let valid = quotes.values().filter(|q| q.is_some()).count();
        debug!("Top movers: {}/{} quotes usable", valid, quotes.len());

        let mut gainers = rank_quotes(&quotes, MoverDirection::Gainers, self.config.max_results);
        let mut losers = rank_quotes(&quotes, MoverDirection::Losers, self.config.max_results);

        // Small universes can put a ticker in both lists; fetch its candles once
        let mut loaded = HashMap::new();
        self.attach_sparklines(&mut gainers, &mut loaded).await;
        self.attach_sparklines(&mut losers, &mut loaded).await;

        info!(
            "Top movers refreshed: {} gainers, {} losers",
            gainers.len(),
            losers.len()
        );
        Ok(MoversSnapshot { gainers, losers })
    }

    async fn attach_sparklines(
        &self,
        records: &mut [MoverRecord],
        loaded: &mut HashMap<String, Sparkline>,
    ) {
        let count = self.config.sparkline_count.min(records.len());
        for record in records.iter_mut().take(count) {
            if let Some(sparkline) = loaded.get(&record.ticker) {
                record.sparkline = Some(sparkline.clone());
                continue;
            }
            let sparkline = self.load_sparkline(record).await;
            loaded.insert(record.ticker.clone(), sparkline.clone());
            record.sparkline = Some(sparkline);
        }
    }

    /// Intraday 5-minute closes, or a synthetic line when none are available
    async fn load_sparkline(&self, record: &MoverRecord) -> Sparkline {
        let now = Utc::now();
        let range = ((now - Duration::hours(24)).timestamp(), now.timestamp());

        let candles = self
            .source
            .candles(&record.ticker, Resolution::FiveMinutes, Some(range))
            .await;

        let real = match candles {
            Ok(series) => candle_sparkline(&series, self.config.sparkline_points),
            Err(e) => {
                warn!("Failed to load sparkline for {}: {}", record.ticker, e);
                None
            }
        };

        real.unwrap_or_else(|| {
            debug!("Using synthetic sparkline for {}", record.ticker);
            synthetic_sparkline(
                record.previous_close,
                record.price,
                now.timestamp_millis(),
                self.config.sparkline_points,
            )
        })
    }
}
