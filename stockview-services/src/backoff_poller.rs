//! Backoff Poller
//!
//! Runs a fetch on a fixed interval in a background task. A rate-limited
//! fetch doubles the wait (capped at ten minutes), success resets it, and
//! the last good result survives failures. State is published on a watch
//! channel after every transition.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use stockview_core::{PollPhase, PollState, StockViewError, StockViewResult};

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Base interval between fetches
    pub interval: Duration,
}

impl PollerConfig {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(secs),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::from_secs(10)
    }
}

#[derive(Default)]
struct PollerSignals {
    cancelled: AtomicBool,
    refresh_requested: AtomicBool,
    wake: Notify,
}

impl PollerSignals {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

/// Spawns polling loops
pub struct BackoffPoller;

impl BackoffPoller {
    /// Start polling `fetch` on the current tokio runtime.
    ///
    /// `is_rate_limited` decides which errors trigger exponential backoff;
    /// every other error is recorded and retried after the current delay.
    /// The first fetch runs immediately.
    pub fn spawn<T, F, Fut, P>(
        name: impl Into<String>,
        config: PollerConfig,
        mut fetch: F,
        is_rate_limited: P,
    ) -> PollerHandle<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = StockViewResult<T>> + Send + 'static,
        P: Fn(&StockViewError) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let interval_ms = config.interval.as_millis() as u64;
        let (state_tx, state_rx) = watch::channel(PollState::new(interval_ms));
        let signals = Arc::new(PollerSignals::default());

        let task_name = name.clone();
        let task_signals = signals.clone();
        let task = tokio::spawn(async move {
            info!("Starting {} poller with {}ms interval", task_name, interval_ms);
            let mut state = PollState::new(interval_ms);

            loop {
                if task_signals.is_cancelled() {
                    break;
                }

                state.phase = PollPhase::Fetching;
                state_tx.send_replace(state.clone());

                let outcome = fetch().await;
                if task_signals.is_cancelled() {
                    debug!("{} poller cancelled mid-fetch, discarding result", task_name);
                    break;
                }

                match outcome {
                    Ok(result) => {
                        state.record_success(result);
                        debug!("{} poll succeeded", task_name);
                    }
                    Err(e) if is_rate_limited(&e) => {
                        let delay = state.record_rate_limited();
                        warn!(
                            "{} poll rate limited ({} in a row), next attempt in {}ms",
                            task_name, state.consecutive_rate_limits, delay
                        );
                    }
                    Err(e) => {
                        warn!("{} poll failed: {}", task_name, e);
                        state.record_failure(e.to_string());
                    }
                }

                state.schedule_from(Utc::now());
                state_tx.send_replace(state.clone());

                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(state.current_delay_ms)) => {}
                    _ = task_signals.wake.notified() => {}
                }

                if task_signals.is_cancelled() {
                    break;
                }
                if task_signals.refresh_requested.swap(false, Ordering::SeqCst) {
                    debug!("{} poller manual refresh", task_name);
                    state.reset_delay();
                }
            }

            info!("{} poller stopped", task_name);
        });

        PollerHandle {
            name,
            signals,
            state: state_rx,
            task: Some(task),
        }
    }
}

/// Owner of a running poll loop. Dropping it stops the loop.
pub struct PollerHandle<T> {
    name: String,
    signals: Arc<PollerSignals>,
    state: watch::Receiver<PollState<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone> PollerHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state snapshot
    pub fn state(&self) -> PollState<T> {
        self.state.borrow().clone()
    }

    pub fn latest(&self) -> Option<T> {
        self.state.borrow().last_good_result.clone()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<PollState<T>> {
        self.state.clone()
    }

    /// Skip the pending wait, reset the delay to the base interval and fetch now
    pub fn refresh(&self) {
        self.signals.refresh_requested.store(true, Ordering::SeqCst);
        self.signals.wake.notify_one();
    }

    /// Stop the loop and wait for the task to exit.
    ///
    /// A fetch already in flight finishes, but its result is discarded.
    pub async fn shutdown(mut self) {
        self.signals.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("{} poller task ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl<T> Drop for PollerHandle<T> {
    fn drop(&mut self) {
        self.signals.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    use parking_lot::Mutex;
    use tokio::time::Instant;

    use stockview_core::MAX_BACKOFF_MS;

    fn rate_limited() -> StockViewError {
        StockViewError::RateLimited {
            retry_after_secs: None,
        }
    }

    /// Poller over a scripted result queue; an exhausted script yields `Ok(0)`
    fn scripted(
        interval_secs: u64,
        script: Vec<StockViewResult<u32>>,
    ) -> (PollerHandle<u32>, Arc<Mutex<Vec<Instant>>>) {
        let script = Arc::new(Mutex::new(VecDeque::from(script)));
        let fetched_at = Arc::new(Mutex::new(Vec::new()));

        let log = fetched_at.clone();
        let handle = BackoffPoller::spawn(
            "test",
            PollerConfig::from_secs(interval_secs),
            move || {
                let script = script.clone();
                let log = log.clone();
                async move {
                    log.lock().push(Instant::now());
                    script.lock().pop_front().unwrap_or(Ok(0))
                }
            },
            StockViewError::is_rate_limited,
        );
        (handle, fetched_at)
    }

    async fn wait_for<T: Clone>(
        rx: &mut watch::Receiver<PollState<T>>,
        done: impl Fn(&PollState<T>) -> bool,
    ) -> PollState<T> {
        loop {
            {
                let state = rx.borrow_and_update();
                if done(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    }

    fn gaps(instants: &[Instant]) -> Vec<u64> {
        instants
            .windows(2)
            .map(|w| (w[1] - w[0]).as_secs())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limits_double_the_wait() {
        let script = (0..5).map(|_| Err(rate_limited())).collect();
        let (handle, fetched_at) = scripted(10, script);
        let mut rx = handle.subscribe();

        let state = wait_for(&mut rx, |s| s.consecutive_rate_limits == 5).await;
        assert_eq!(state.current_delay_ms, 320_000);
        assert!(state.last_error.as_deref().unwrap().contains("~320s"));
        assert!(state.last_good_result.is_none());

        let state = wait_for(&mut rx, |s| s.last_good_result.is_some()).await;
        assert_eq!(state.current_delay_ms, 10_000);
        assert!(state.last_error.is_none());

        assert_eq!(gaps(&fetched_at.lock()), vec![20, 40, 80, 160, 320]);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_capped() {
        let script = (0..8).map(|_| Err(rate_limited())).collect();
        let (handle, _) = scripted(10, script);
        let mut rx = handle.subscribe();

        let state = wait_for(&mut rx, |s| s.consecutive_rate_limits == 8).await;
        assert_eq!(state.current_delay_ms, MAX_BACKOFF_MS);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_failures_keep_delay_and_last_good() {
        let script = vec![
            Ok(7),
            Err(StockViewError::network("reset")),
            Err(StockViewError::MissingCredential),
        ];
        let (handle, fetched_at) = scripted(10, script);
        let mut rx = handle.subscribe();

        wait_for(&mut rx, |s| s.last_good_result == Some(7)).await;
        let state = wait_for(&mut rx, |s| {
            s.last_error.as_deref().map_or(false, |e| e.contains("API key"))
        })
        .await;

        assert_eq!(state.last_good_result, Some(7));
        assert_eq!(state.current_delay_ms, 10_000);
        assert!(!state.is_rate_limited());
        assert_eq!(gaps(&fetched_at.lock()), vec![10, 10]);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_fetches_now_and_resets_delay() {
        let script = vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Err(StockViewError::network("reset")),
        ];
        let (handle, fetched_at) = scripted(60, script);
        let mut rx = handle.subscribe();

        let state = wait_for(&mut rx, |s| {
            s.consecutive_rate_limits == 2 && s.phase == PollPhase::Idle
        })
        .await;
        assert_eq!(state.current_delay_ms, 240_000);

        handle.refresh();
        let state = wait_for(&mut rx, |s| {
            s.last_error.as_deref().map_or(false, |e| e.contains("reset"))
        })
        .await;

        // Reset by the refresh, untouched by the plain failure
        assert_eq!(state.current_delay_ms, 60_000);
        let instants = fetched_at.lock().clone();
        assert_eq!(instants.len(), 3);
        assert!(instants[2] - instants[1] < Duration::from_secs(240));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_rearming() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = fetches.clone();
        let handle = BackoffPoller::spawn(
            "counter",
            PollerConfig::from_secs(5),
            move || {
                let counter = counter.clone();
                async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
            },
            StockViewError::is_rate_limited,
        );
        let mut rx = handle.subscribe();
        wait_for(&mut rx, |s| s.last_good_result.is_some()).await;

        handle.shutdown().await;
        let after_shutdown = fetches.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), after_shutdown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_discarded_after_cancel() {
        let handle = BackoffPoller::spawn(
            "slow",
            PollerConfig::from_secs(5),
            || async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Ok(1u32)
            },
            StockViewError::is_rate_limited,
        );
        let mut rx = handle.subscribe();
        wait_for(&mut rx, |s| s.phase == PollPhase::Fetching).await;

        handle.shutdown().await;
        let state = rx.borrow().clone();
        assert!(state.last_good_result.is_none());
        assert_eq!(state.phase, PollPhase::Fetching);
    }
}
