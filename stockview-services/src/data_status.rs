//! Connectivity probe for the market data source

use serde::Serialize;
use tracing::{info, warn};

use stockview_core::MarketDataSource;

/// Symbol quoted by the probe
pub const PROBE_SYMBOL: &str = "AAPL";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatus {
    pub has_key: bool,
    pub quote_ok: bool,
    pub news_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl DataStatus {
    pub fn is_healthy(&self) -> bool {
        self.has_key && self.quote_ok && self.news_ok
    }
}

/// Probe the source with one quote and one general news request.
///
/// Without a credential nothing is requested.
pub async fn probe_data_status(source: &dyn MarketDataSource) -> DataStatus {
    let mut status = DataStatus {
        has_key: source.has_credential(),
        quote_ok: false,
        news_ok: false,
        last_error: None,
    };

    if !status.has_key {
        warn!("Data status: no API key configured");
        status.last_error = Some("Missing FINNHUB_API_KEY".to_string());
        return status;
    }

    match source.quote(PROBE_SYMBOL).await {
        Ok(_) => status.quote_ok = true,
        Err(e) => status.last_error = Some(format!("Quote error: {}", e)),
    }

    match source.market_news("general", 0).await {
        Ok(_) => status.news_ok = true,
        Err(e) => status.last_error = Some(format!("News error: {}", e)),
    }

    info!(
        "Data status: key={} quote={} news={}",
        status.has_key, status.quote_ok, status.news_ok
    );
    status
}
