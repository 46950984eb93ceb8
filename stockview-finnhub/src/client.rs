//! Finnhub API client
//!
//! Provides methods for the Finnhub REST endpoints StockView consumes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use stockview_core::{
    CandleSeries, ListedSymbol, MarketDataSource, Quote, RawNewsItem, Resolution,
    SocialSentiment, StockViewError, StockViewResult, SymbolMatch,
};
use tracing::{debug, instrument};

use crate::config::FinnhubConfig;
use crate::rate_limiter::RateLimiter;
use crate::types::{CandleResponse, QuoteResponse, SearchResponse};

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Finnhub API client
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    limiter: Arc<RateLimiter>,
}

impl FinnhubClient {
    /// Create a client from configuration.
    ///
    /// A missing API key is accepted; every call then fails with
    /// [`StockViewError::MissingCredential`] before touching the network.
    pub fn new(config: FinnhubConfig) -> StockViewResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StockViewError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            limiter: Arc::new(RateLimiter::new(config.min_request_interval_ms, "Finnhub")),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared request limiter (exposed for stats)
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    fn token(&self) -> StockViewResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(StockViewError::MissingCredential)
    }

    /// GET `{base_url}{path}` with query parameters and the token appended
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> StockViewResult<T> {
        let token = self.token()?;
        self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching Finnhub {} {:?}", path, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| StockViewError::network(format!("Failed to fetch {}: {}", path, e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(StockViewError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StockViewError::api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| StockViewError::parse(format!("Failed to parse {} response: {}", path, e)))
    }

    /// GET a news feed, decoding article by article.
    ///
    /// Articles that fail to decode are skipped; the rest of the feed is kept.
    async fn get_news(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> StockViewResult<Vec<RawNewsItem>> {
        let raw: Vec<Value> = self.get_json(path, params).await?;
        let total = raw.len();

        let items: Vec<RawNewsItem> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    debug!("Skipping malformed {} article: {}", path, e);
                    None
                }
            })
            .collect();

        if items.len() < total {
            debug!("Kept {} of {} articles from {}", items.len(), total, path);
        }
        Ok(items)
    }

    /// Candles with an explicit or resolution-derived window
    #[instrument(skip(self))]
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        range: Option<(i64, i64)>,
    ) -> StockViewResult<CandleSeries> {
        let (from, to) = range.unwrap_or_else(|| resolution.default_window(Utc::now()));

        let response: CandleResponse = self
            .get_json(
                "/stock/candle",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", resolution.as_str().to_string()),
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                ],
            )
            .await?;

        let series = response.into_series(symbol, resolution)?;
        debug!("Received {} candles for {}", series.len(), symbol);
        Ok(series)
    }
}

#[async_trait]
impl MarketDataSource for FinnhubClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self))]
    async fn quote(&self, symbol: &str) -> StockViewResult<Quote> {
        let response: QuoteResponse = self
            .get_json("/quote", &[("symbol", symbol.to_string())])
            .await?;
        response.into_quote(symbol)
    }

    async fn candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        range: Option<(i64, i64)>,
    ) -> StockViewResult<CandleSeries> {
        self.fetch_candles(symbol, resolution, range).await
    }

    #[instrument(skip(self))]
    async fn search_symbol(&self, query: &str) -> StockViewResult<Vec<SymbolMatch>> {
        let response: SearchResponse = self
            .get_json("/search", &[("q", query.to_string())])
            .await?;
        debug!("Search '{}' returned {} of {} matches", query, response.result.len(), response.count);
        Ok(response.result)
    }

    #[instrument(skip(self))]
    async fn symbol_list(&self, exchange: &str) -> StockViewResult<Vec<ListedSymbol>> {
        self.get_json("/stock/symbol", &[("exchange", exchange.to_string())])
            .await
    }

    #[instrument(skip(self))]
    async fn market_news(&self, category: &str, min_id: i64) -> StockViewResult<Vec<RawNewsItem>> {
        self.get_news(
            "/news",
            &[("category", category.to_string()), ("minId", min_id.to_string())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StockViewResult<Vec<RawNewsItem>> {
        self.get_news(
            "/company-news",
            &[
                ("symbol", symbol.to_string()),
                ("from", date_param(from)),
                ("to", date_param(to)),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn social_sentiment(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StockViewResult<SocialSentiment> {
        self.get_json(
            "/stock/social-sentiment",
            &[
                ("symbol", symbol.to_string()),
                ("from", date_param(from)),
                ("to", date_param(to)),
            ],
        )
        .await
    }
}
