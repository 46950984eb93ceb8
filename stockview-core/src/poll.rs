//! Observable state of a backoff poller

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for the backoff delay (10 minutes)
pub const MAX_BACKOFF_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollPhase {
    Idle,
    Fetching,
}

/// Snapshot of a poller, published to subscribers after every transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollState<T> {
    pub interval_ms: u64,
    pub current_delay_ms: u64,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub last_good_result: Option<T>,
    pub last_error: Option<String>,
    pub phase: PollPhase,
    pub last_success_at: Option<DateTime<Utc>>,
    pub consecutive_rate_limits: u32,
}

impl<T> PollState<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            current_delay_ms: interval_ms,
            next_retry_at: None,
            last_good_result: None,
            last_error: None,
            phase: PollPhase::Idle,
            last_success_at: None,
            consecutive_rate_limits: 0,
        }
    }

    /// Replace the last-good result and reset the delay
    pub fn record_success(&mut self, result: T) {
        self.last_good_result = Some(result);
        self.last_error = None;
        self.last_success_at = Some(Utc::now());
        self.consecutive_rate_limits = 0;
        self.current_delay_ms = self.interval_ms;
    }

    /// Double the delay (capped) and keep the last-good result.
    ///
    /// Returns the new delay.
    pub fn record_rate_limited(&mut self) -> u64 {
        let next = self.current_delay_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
        self.current_delay_ms = next;
        self.consecutive_rate_limits += 1;
        let seconds = next.div_ceil(1000);
        self.last_error = Some(format!(
            "Rate limit from data provider (429). Backing off for ~{}s before retrying.",
            seconds
        ));
        next
    }

    /// Record a non rate-limit failure; delay is left unchanged
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.consecutive_rate_limits = 0;
    }

    /// Manual refresh resets the delay to the base interval
    pub fn reset_delay(&mut self) {
        self.current_delay_ms = self.interval_ms;
        self.consecutive_rate_limits = 0;
    }

    /// Mark the next fetch `current_delay_ms` from `now`
    pub fn schedule_from(&mut self, now: DateTime<Utc>) {
        self.next_retry_at = Some(now + Duration::milliseconds(self.current_delay_ms as i64));
        self.phase = PollPhase::Idle;
    }

    pub fn is_rate_limited(&self) -> bool {
        self.consecutive_rate_limits > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_resets() {
        let mut state: PollState<Vec<u32>> = PollState::new(10_000);

        // Delay in effect before each of five consecutive 429s
        let mut delays = Vec::new();
        for _ in 0..5 {
            delays.push(state.current_delay_ms);
            state.record_rate_limited();
        }
        assert_eq!(delays, vec![10_000, 20_000, 40_000, 80_000, 160_000]);
        assert_eq!(state.current_delay_ms, 320_000);
        assert_eq!(state.consecutive_rate_limits, 5);
        assert!(state.last_error.as_deref().unwrap().contains("~320s"));

        state.record_success(vec![1]);
        assert_eq!(state.current_delay_ms, 10_000);
        assert!(state.last_error.is_none());
        assert!(!state.is_rate_limited());
    }

    #[test]
    fn test_backoff_capped_at_ten_minutes() {
        let mut state: PollState<()> = PollState::new(10_000);
        for _ in 0..20 {
            assert!(state.record_rate_limited() <= MAX_BACKOFF_MS);
        }
        assert_eq!(state.current_delay_ms, MAX_BACKOFF_MS);
    }

    #[test]
    fn test_rate_limit_preserves_last_good() {
        let mut state = PollState::new(1_000);
        state.record_success("headlines");
        state.record_rate_limited();
        assert_eq!(state.last_good_result, Some("headlines"));
    }

    #[test]
    fn test_failure_keeps_delay() {
        let mut state: PollState<()> = PollState::new(1_000);
        state.record_rate_limited();
        state.record_failure("boom");
        assert_eq!(state.current_delay_ms, 2_000);
        assert_eq!(state.last_error.as_deref(), Some("boom"));

        state.reset_delay();
        assert_eq!(state.current_delay_ms, 1_000);
    }

    #[test]
    fn test_schedule_from() {
        let mut state: PollState<()> = PollState::new(5_000);
        let now = Utc::now();
        state.phase = PollPhase::Fetching;
        state.schedule_from(now);
        assert_eq!(state.next_retry_at, Some(now + Duration::milliseconds(5_000)));
        assert_eq!(state.phase, PollPhase::Idle);
    }
}
