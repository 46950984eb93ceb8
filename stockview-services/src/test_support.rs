//! In-memory [`MarketDataSource`] used by service tests

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use stockview_core::{
    CandleSeries, ListedSymbol, MarketDataSource, Quote, RawNewsItem, Resolution, SocialMention,
    SocialSentiment, StockViewError, StockViewResult, SymbolMatch,
};

pub fn mention(key: &str, total: i64, positive: i64, negative: i64) -> SocialMention {
    SocialMention {
        mention: total,
        positive_mention: positive,
        negative_mention: negative,
        at_time: Some(key.to_string()),
        date: None,
        time: None,
    }
}

pub fn quote(price: f64, change_percent: f64) -> Quote {
    // change consistent with the percent over the previous close
    let previous = price / (1.0 + change_percent / 100.0);
    Quote::new(price, price - previous, Some(change_percent))
}

pub fn article(id: i64, datetime: i64, headline: &str) -> RawNewsItem {
    RawNewsItem {
        id: Some(id),
        category: None,
        datetime,
        headline: headline.to_string(),
        summary: String::new(),
        source: "Reuters".to_string(),
        url: format!("https://news.test/{}", id),
        image: None,
        related: None,
    }
}

/// Scripted source. Unknown quote symbols fail with `UnexpectedShape`,
/// unknown sentiment symbols return an empty payload, unknown candles are
/// empty.
pub struct StubSource {
    credential: bool,
    quotes: HashMap<String, Quote>,
    quote_errors: HashMap<String, StockViewError>,
    sentiments: HashMap<String, SocialSentiment>,
    sentiment_errors: HashMap<String, StockViewError>,
    candles: HashMap<String, StockViewResult<CandleSeries>>,
    market_news: StockViewResult<Vec<RawNewsItem>>,
    company_news: HashMap<String, StockViewResult<Vec<RawNewsItem>>>,
    calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self {
            credential: true,
            quotes: HashMap::new(),
            quote_errors: HashMap::new(),
            sentiments: HashMap::new(),
            sentiment_errors: HashMap::new(),
            candles: HashMap::new(),
            market_news: Ok(Vec::new()),
            company_news: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credential() -> Self {
        Self {
            credential: false,
            ..Self::new()
        }
    }

    pub fn with_quote(mut self, symbol: &str, quote: Quote) -> Self {
        self.quotes.insert(symbol.to_string(), quote);
        self
    }

    pub fn with_quote_error(mut self, symbol: &str, error: StockViewError) -> Self {
        self.quote_errors.insert(symbol.to_string(), error);
        self
    }

    pub fn with_sentiment(mut self, symbol: &str, sentiment: SocialSentiment) -> Self {
        self.sentiments.insert(symbol.to_string(), sentiment);
        self
    }

    pub fn with_sentiment_error(mut self, symbol: &str, error: StockViewError) -> Self {
        self.sentiment_errors.insert(symbol.to_string(), error);
        self
    }

    pub fn with_candles(mut self, symbol: &str, candles: StockViewResult<CandleSeries>) -> Self {
        self.candles.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_market_news(mut self, news: StockViewResult<Vec<RawNewsItem>>) -> Self {
        self.market_news = news;
        self
    }

    pub fn with_company_news(
        mut self,
        symbol: &str,
        news: StockViewResult<Vec<RawNewsItem>>,
    ) -> Self {
        self.company_news.insert(symbol.to_string(), news);
        self
    }

    /// Calls in order, e.g. `quote:AAPL`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) -> StockViewResult<()> {
        if !self.credential {
            return Err(StockViewError::MissingCredential);
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

#[async_trait]
impl MarketDataSource for StubSource {
    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn quote(&self, symbol: &str) -> StockViewResult<Quote> {
        self.record(format!("quote:{}", symbol))?;
        if let Some(err) = self.quote_errors.get(symbol) {
            return Err(err.clone());
        }
        self.quotes
            .get(symbol)
            .copied()
            .ok_or_else(|| StockViewError::unexpected_shape(format!("no quote for {}", symbol)))
    }

    async fn candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        _range: Option<(i64, i64)>,
    ) -> StockViewResult<CandleSeries> {
        self.record(format!("candles:{}", symbol))?;
        self.candles
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Ok(CandleSeries::empty(symbol, resolution)))
    }

    async fn search_symbol(&self, query: &str) -> StockViewResult<Vec<SymbolMatch>> {
        self.record(format!("search:{}", query))?;
        Ok(Vec::new())
    }

    async fn symbol_list(&self, exchange: &str) -> StockViewResult<Vec<ListedSymbol>> {
        self.record(format!("symbols:{}", exchange))?;
        Ok(Vec::new())
    }

    async fn market_news(&self, category: &str, _min_id: i64) -> StockViewResult<Vec<RawNewsItem>> {
        self.record(format!("news:{}", category))?;
        self.market_news.clone()
    }

    async fn company_news(
        &self,
        symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> StockViewResult<Vec<RawNewsItem>> {
        self.record(format!("company_news:{}", symbol))?;
        self.company_news
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn social_sentiment(
        &self,
        symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> StockViewResult<SocialSentiment> {
        self.record(format!("sentiment:{}", symbol))?;
        if let Some(err) = self.sentiment_errors.get(symbol) {
            return Err(err.clone());
        }
        Ok(self.sentiments.get(symbol).cloned().unwrap_or_default())
    }
}
