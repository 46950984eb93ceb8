//! Finnhub API response types
//!
//! These types mirror the Finnhub REST responses and are converted to
//! stockview-core types before leaving this crate.

use serde::Deserialize;
use stockview_core::{
    CandlePoint, CandleSeries, Quote, Resolution, StockViewError, StockViewResult, SymbolMatch,
};

/// Response from GET /quote
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteResponse {
    /// Current price
    #[serde(default)]
    pub c: Option<f64>,
    /// Change
    #[serde(default)]
    pub d: Option<f64>,
    /// Percent change
    #[serde(default)]
    pub dp: Option<f64>,
    /// High price of the day
    #[serde(default)]
    pub h: Option<f64>,
    /// Low price of the day
    #[serde(default)]
    pub l: Option<f64>,
    /// Open price of the day
    #[serde(default)]
    pub o: Option<f64>,
    /// Previous close
    #[serde(default)]
    pub pc: Option<f64>,
    /// Epoch seconds of the last trade
    #[serde(default)]
    pub t: Option<i64>,
}

/// Finnhub reports unknown fields as zero; treat zero as absent.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl QuoteResponse {
    /// Convert to a core quote.
    ///
    /// Unknown symbols come back with `c: 0` and null changes, which is
    /// reported as [`StockViewError::UnexpectedShape`].
    pub fn into_quote(self, symbol: &str) -> StockViewResult<Quote> {
        let price = positive(self.c).ok_or_else(|| {
            StockViewError::unexpected_shape(format!("quote for {} has no current price", symbol))
        })?;

        Ok(Quote {
            price,
            change: self.d.filter(|d| d.is_finite()).unwrap_or(0.0),
            change_percent: self.dp.filter(|p| p.is_finite()),
            volume: None,
            market_cap: None,
            day_high: positive(self.h),
            day_low: positive(self.l),
            previous_close: positive(self.pc),
        })
    }
}

/// Response from GET /stock/candle
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandleResponse {
    #[serde(default)]
    pub c: Option<Vec<f64>>,
    #[serde(default)]
    pub t: Option<Vec<i64>>,
    /// "ok" or "no_data"
    #[serde(default)]
    pub s: String,
}

impl CandleResponse {
    pub fn into_series(self, symbol: &str, resolution: Resolution) -> StockViewResult<CandleSeries> {
        if self.s == "no_data" {
            return Ok(CandleSeries::empty(symbol, resolution));
        }

        let (closes, timestamps) = match (self.c, self.t) {
            (Some(c), Some(t)) => (c, t),
            _ => {
                return Err(StockViewError::unexpected_shape(format!(
                    "candles for {} missing c/t arrays (status '{}')",
                    symbol, self.s
                )))
            }
        };

        let points = timestamps
            .into_iter()
            .zip(closes)
            .filter(|(_, close)| close.is_finite())
            .map(|(timestamp, close)| CandlePoint { timestamp, close })
            .collect();

        Ok(CandleSeries {
            symbol: symbol.to_string(),
            resolution,
            points,
        })
    }
}

/// Response from GET /search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub result: Vec<SymbolMatch>,
}
