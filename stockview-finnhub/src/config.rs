//! Finnhub client configuration

use std::env;

use tracing::warn;

use crate::rate_limiter::FINNHUB_MIN_REQUEST_INTERVAL_MS;

/// Base URL for the Finnhub REST API
pub const FINNHUB_API_BASE: &str = "https://finnhub.io/api/v1";

/// Configuration for [`FinnhubClient`](crate::FinnhubClient).
///
/// Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct FinnhubConfig {
    /// API token. `None` makes every client call fail with `MissingCredential`.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Minimum gap between requests
    pub min_request_interval_ms: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: FINNHUB_API_BASE.to_string(),
            min_request_interval_ms: FINNHUB_MIN_REQUEST_INTERVAL_MS,
            timeout_secs: 30,
        }
    }
}

impl FinnhubConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - FINNHUB_API_KEY (falls back to VITE_FINNHUB_KEY)
    /// - FINNHUB_BASE_URL
    /// - FINNHUB_MIN_REQUEST_INTERVAL_MS
    pub fn from_env() -> Self {
        let api_key = ["FINNHUB_API_KEY", "VITE_FINNHUB_KEY"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());

        let base_url = env::var("FINNHUB_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FINNHUB_API_BASE.to_string());

        let min_request_interval_ms = match env::var("FINNHUB_MIN_REQUEST_INTERVAL_MS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring invalid FINNHUB_MIN_REQUEST_INTERVAL_MS '{}', using {}ms",
                    raw, FINNHUB_MIN_REQUEST_INTERVAL_MS
                );
                FINNHUB_MIN_REQUEST_INTERVAL_MS
            }),
            Err(_) => FINNHUB_MIN_REQUEST_INTERVAL_MS,
        };

        Self {
            api_key,
            base_url,
            min_request_interval_ms,
            ..Self::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
