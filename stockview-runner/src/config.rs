//! Runner settings read from the environment

use std::path::PathBuf;

use tracing::warn;

/// Poll intervals and cache location for the three feeds
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub trending_interval_secs: u64,
    pub movers_interval_secs: u64,
    pub news_interval_secs: u64,
    /// JSON file for the last-good trending list; memory only when unset
    pub cache_path: Option<PathBuf>,
    pub news_breaking_only: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            trending_interval_secs: 5,
            movers_interval_secs: 120,
            news_interval_secs: 10,
            cache_path: None,
            news_breaking_only: false,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - STOCKVIEW_TRENDING_INTERVAL_SECS
    /// - STOCKVIEW_MOVERS_INTERVAL_SECS
    /// - STOCKVIEW_NEWS_INTERVAL_SECS
    /// - STOCKVIEW_CACHE_PATH
    /// - STOCKVIEW_NEWS_BREAKING_ONLY
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |name: &str, default: u64| -> u64 {
            let Some(raw) = lookup(name) else {
                return default;
            };
            match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!("Ignoring invalid {} '{}', using {}s", name, raw, default);
                    default
                }
            }
        };

        Self {
            trending_interval_secs: secs(
                "STOCKVIEW_TRENDING_INTERVAL_SECS",
                defaults.trending_interval_secs,
            ),
            movers_interval_secs: secs("STOCKVIEW_MOVERS_INTERVAL_SECS", defaults.movers_interval_secs),
            news_interval_secs: secs("STOCKVIEW_NEWS_INTERVAL_SECS", defaults.news_interval_secs),
            cache_path: lookup("STOCKVIEW_CACHE_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            news_breaking_only: lookup("STOCKVIEW_NEWS_BREAKING_ONLY")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.news_breaking_only),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> RunnerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunnerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(load(&[]), RunnerConfig::default());
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = load(&[
            ("STOCKVIEW_TRENDING_INTERVAL_SECS", "30"),
            ("STOCKVIEW_MOVERS_INTERVAL_SECS", "soon"),
            ("STOCKVIEW_NEWS_INTERVAL_SECS", "0"),
            ("STOCKVIEW_CACHE_PATH", "data/trending.json"),
            ("STOCKVIEW_NEWS_BREAKING_ONLY", "True"),
        ]);

        assert_eq!(config.trending_interval_secs, 30);
        assert_eq!(config.movers_interval_secs, 120);
        assert_eq!(config.news_interval_secs, 10);
        assert_eq!(config.cache_path, Some(PathBuf::from("data/trending.json")));
        assert!(config.news_breaking_only);
    }
}
