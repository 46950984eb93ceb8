//! Quote data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Latest price snapshot for a single symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Current price
    pub price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Percent change since previous close, when the provider supplies it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
}

impl Quote {
    /// Quote with only the three core fields populated
    pub fn new(price: f64, change: f64, change_percent: Option<f64>) -> Self {
        Self {
            price,
            change,
            change_percent,
            volume: None,
            market_cap: None,
            day_high: None,
            day_low: None,
            previous_close: None,
        }
    }

    /// Previous close, derived as `price - change` when not supplied
    pub fn previous_close(&self) -> f64 {
        self.previous_close.unwrap_or(self.price - self.change)
    }

    /// Change percent from the provider, or recomputed from the previous close.
    ///
    /// Returns `None` when the previous close is not positive.
    pub fn resolved_change_percent(&self) -> Option<f64> {
        if let Some(pct) = self.change_percent.filter(|p| p.is_finite()) {
            return Some(pct);
        }
        let previous = self.previous_close();
        if previous > 0.0 && self.change.is_finite() {
            Some(self.change / previous * 100.0)
        } else {
            None
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume.unwrap_or(0.0)
    }

    pub fn market_cap(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }

    pub fn day_high(&self) -> f64 {
        self.day_high.unwrap_or(self.price)
    }

    pub fn day_low(&self) -> f64 {
        self.day_low.unwrap_or(self.price)
    }

    /// A usable quote has a finite, positive price
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Batch quote result. `None` marks a symbol whose fetch failed.
pub type QuoteMap = BTreeMap<String, Option<Quote>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_close_derived_from_change() {
        let quote = Quote::new(10.5, 0.5, Some(5.0));
        assert_eq!(quote.previous_close(), 10.0);

        let explicit = Quote {
            previous_close: Some(9.0),
            ..quote
        };
        assert_eq!(explicit.previous_close(), 9.0);
    }

    #[test]
    fn test_resolved_change_percent_recomputes() {
        let quote = Quote::new(4.4, 0.4, None);
        let pct = quote.resolved_change_percent().unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolved_change_percent_guards_non_positive_previous() {
        let quote = Quote::new(1.0, 1.0, None);
        assert_eq!(quote.resolved_change_percent(), None);

        let quote = Quote::new(1.0, 2.0, None);
        assert_eq!(quote.resolved_change_percent(), None);
    }

    #[test]
    fn test_derived_defaults() {
        let quote = Quote::new(12.0, -1.0, Some(-7.69));
        assert_eq!(quote.day_high(), 12.0);
        assert_eq!(quote.day_low(), 12.0);
        assert_eq!(quote.volume(), 0.0);
        assert_eq!(quote.market_cap(), 0.0);
        assert!(quote.has_valid_price());
        assert!(!Quote::new(0.0, 0.0, None).has_valid_price());
        assert!(!Quote::new(f64::NAN, 0.0, None).has_valid_price());
    }
}
