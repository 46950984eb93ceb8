//! Last-good cache for trending results
//!
//! The scanner stores every non-empty scan here and serves the cached items
//! as stale when a later scan comes back empty.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use stockview_core::TrendingResult;

/// Storage port for the last non-empty trending scan.
///
/// Implementations are best effort: a failed write is logged, a failed read
/// is a cache miss.
pub trait TrendingCache: Send + Sync {
    fn get(&self) -> Option<Vec<TrendingResult>>;

    fn set(&self, items: &[TrendingResult]);
}

/// Process-local cache
#[derive(Default)]
pub struct MemoryTrendingCache {
    items: RwLock<Option<Vec<TrendingResult>>>,
}

impl MemoryTrendingCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrendingCache for MemoryTrendingCache {
    fn get(&self) -> Option<Vec<TrendingResult>> {
        self.items.read().clone()
    }

    fn set(&self, items: &[TrendingResult]) {
        *self.items.write() = Some(items.to_vec());
    }
}

/// JSON file cache that survives restarts.
///
/// Reads go through an in-memory copy; the file is only read on first use.
pub struct FileTrendingCache {
    path: PathBuf,
    memory: RwLock<Option<Vec<TrendingResult>>>,
}

impl FileTrendingCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        info!("Trending cache file: {}", path.display());
        Self {
            path,
            memory: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Option<Vec<TrendingResult>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No trending cache at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<TrendingResult>>(&contents) {
            Ok(items) if !items.is_empty() => Some(items),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring corrupt trending cache {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl TrendingCache for FileTrendingCache {
    fn get(&self) -> Option<Vec<TrendingResult>> {
        if let Some(items) = self.memory.read().clone() {
            return Some(items);
        }

        let loaded = self.read_file()?;
        *self.memory.write() = Some(loaded.clone());
        Some(loaded)
    }

    fn set(&self, items: &[TrendingResult]) {
        *self.memory.write() = Some(items.to_vec());

        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize trending cache: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("Failed to write trending cache {}: {}", self.path.display(), e);
        } else {
            debug!("Stored {} trending results to {}", items.len(), self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::quote;
    use stockview_core::FallbackTier;

    fn items() -> Vec<TrendingResult> {
        vec![TrendingResult::from_price_move(
            "SNDL",
            &quote(2.5, 4.0),
            4.0,
            FallbackTier::Price5,
        )]
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("stockview-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryTrendingCache::new();
        assert!(cache.get().is_none());

        cache.set(&items());
        assert_eq!(cache.get().unwrap()[0].symbol, "SNDL");
    }

    #[test]
    fn test_file_cache_survives_new_instance() {
        let path = temp_path("trending-roundtrip.json");
        std::fs::remove_file(&path).ok();

        FileTrendingCache::new(&path).set(&items());

        let reopened = FileTrendingCache::new(&path);
        let cached = reopened.get().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].fallback, Some(FallbackTier::Price5));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_cache_corrupt_file_is_a_miss() {
        let path = temp_path("trending-corrupt.json");
        let cache = FileTrendingCache::new(&path);
        std::fs::write(&path, "{not json").unwrap();

        assert!(cache.get().is_none());
        std::fs::remove_file(&path).ok();
    }
}
