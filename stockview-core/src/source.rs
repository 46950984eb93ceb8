//! Market data source abstraction
//!
//! Services depend on this trait rather than a concrete HTTP client so that
//! aggregation and fallback logic can run against in-memory stubs.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::candle::{CandleSeries, Resolution};
use crate::error::{StockViewError, StockViewResult};
use crate::news::RawNewsItem;
use crate::quote::{Quote, QuoteMap};
use crate::sentiment::SocialSentiment;
use crate::symbol::{ListedSymbol, SymbolMatch};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Whether an API credential is configured
    fn has_credential(&self) -> bool;

    /// Latest quote for one symbol
    async fn quote(&self, symbol: &str) -> StockViewResult<Quote>;

    /// Quotes for a batch, fetched one symbol at a time.
    ///
    /// A failed symbol yields `None` in its slot and never aborts the batch.
    /// Only a missing credential fails the whole call.
    async fn quotes(&self, symbols: &[String]) -> StockViewResult<QuoteMap> {
        if !self.has_credential() {
            return Err(StockViewError::MissingCredential);
        }

        let mut out = QuoteMap::new();
        for symbol in symbols {
            let slot = match self.quote(symbol).await {
                Ok(quote) => Some(quote),
                Err(StockViewError::MissingCredential) => {
                    return Err(StockViewError::MissingCredential);
                }
                Err(e @ StockViewError::UnexpectedShape(_)) => {
                    debug!("Skipping quote for {}: {}", symbol, e);
                    None
                }
                Err(e) => {
                    warn!("Quote fetch failed for {}: {}", symbol, e);
                    None
                }
            };
            out.insert(symbol.clone(), slot);
        }
        Ok(out)
    }

    /// Closes for a symbol. `range` is `(from, to)` in epoch seconds; when
    /// absent the window is derived from the resolution.
    async fn candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        range: Option<(i64, i64)>,
    ) -> StockViewResult<CandleSeries>;

    /// Ranked symbol matches for a free-text query
    async fn search_symbol(&self, query: &str) -> StockViewResult<Vec<SymbolMatch>>;

    /// Every symbol listed on an exchange (large)
    async fn symbol_list(&self, exchange: &str) -> StockViewResult<Vec<ListedSymbol>>;

    /// General market news for a category
    async fn market_news(&self, category: &str, min_id: i64) -> StockViewResult<Vec<RawNewsItem>>;

    /// Company news between two dates, inclusive
    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StockViewResult<Vec<RawNewsItem>>;

    /// Reddit/Twitter mention series between two dates
    async fn social_sentiment(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StockViewResult<SocialSentiment>;
}
