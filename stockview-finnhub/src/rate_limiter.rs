//! Request spacing for provider calls
//!
//! Every Finnhub request goes through one shared limiter so that sequential
//! batch loops keep a fixed gap between requests, and independent pollers
//! sharing a client never burst.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Default gap between Finnhub requests (250ms = max 4 req/sec).
/// The free tier allows 60/min with short bursts of 30/sec.
pub const FINNHUB_MIN_REQUEST_INTERVAL_MS: u64 = 250;

/// Rate limiter that enforces a minimum delay between requests.
///
/// Callers reserve a time slot while holding the lock and sleep outside it,
/// so concurrent callers always receive distinct slots.
#[derive(Debug)]
pub struct RateLimiter {
    /// Next free slot, in milliseconds since `epoch`
    next_available_ms: Mutex<u64>,
    epoch: Instant,
    min_interval: Duration,
    name: String,
    total_requests: AtomicU64,
    waited_requests: AtomicU64,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64, name: &str) -> Self {
        Self {
            next_available_ms: Mutex::new(0),
            epoch: Instant::now(),
            min_interval: Duration::from_millis(min_interval_ms),
            name: name.to_string(),
            total_requests: AtomicU64::new(0),
            waited_requests: AtomicU64::new(0),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        Instant::now().duration_since(self.epoch).as_millis() as u64
    }

    /// Wait until this caller's reserved slot arrives
    pub async fn acquire(&self) {
        let request_num = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;
        let interval_ms = self.min_interval.as_millis() as u64;
        let now_ms = self.elapsed_ms();

        let wait_ms = {
            let mut next_available = self.next_available_ms.lock().await;
            let slot = (*next_available).max(now_ms);
            *next_available = slot + interval_ms;
            slot - now_ms
        };

        if wait_ms == 0 {
            trace!("[RATE_LIMITER:{}] #{} immediate", self.name, request_num);
            return;
        }

        self.waited_requests.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[RATE_LIMITER:{}] #{} queued for {}ms",
            self.name, request_num, wait_ms
        );
        tokio::time::sleep(Duration::from_millis(wait_ms)).await;
    }

    /// True if a request could go out now without waiting
    pub async fn can_acquire_immediately(&self) -> bool {
        let now_ms = self.elapsed_ms();
        let next_available = self.next_available_ms.lock().await;
        now_ms >= *next_available
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            waited_requests: self.waited_requests.load(Ordering::Relaxed),
            min_interval_ms: self.min_interval.as_millis() as u64,
            name: self.name.clone(),
        }
    }
}

/// Statistics about rate limiter usage
#[derive(Debug, Clone)]
pub struct RateLimiterStats {
    pub total_requests: u64,
    pub waited_requests: u64,
    pub min_interval_ms: u64,
    pub name: String,
}
