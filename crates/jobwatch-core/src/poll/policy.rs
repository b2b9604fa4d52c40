use std::time::Duration;

/// Polling cadence and failure budget.
///
/// The timeout is a budget accumulated from the intervals we waited, not a
/// wall-clock deadline: time spent inside a fetch, or while the process is
/// suspended, does not count against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    /// Wait after the first non-terminal snapshot.
    pub initial_interval: Duration,
    /// Ceiling for the growing interval.
    pub max_interval: Duration,
    /// Growth factor applied after each successful non-terminal poll.
    pub backoff_multiplier: f64,
    /// Total interval budget before giving up on a still-running job.
    pub timeout: Duration,
    /// Consecutive fetch failures tolerated before aborting.
    pub max_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_millis(5000),
            backoff_multiplier: 1.5,
            timeout: Duration::from_millis(300_000),
            max_retries: 3,
        }
    }
}

impl PollConfig {
    /// Interval that follows `current` after a successful non-terminal poll.
    pub fn next_interval(&self, current: Duration) -> Duration {
        // NaN.max(1.0) is 1.0, so a broken multiplier degrades to a fixed interval.
        let factor = self.backoff_multiplier.max(1.0);
        Duration::try_from_secs_f64(current.as_secs_f64() * factor)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }
}

/// Decision after a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Budget exhausted after this many consecutive failures.
    GiveUp(u32),
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Mutable state of one poll session: the current interval, the budget
/// consumed so far and the consecutive failure count.
///
/// Successful non-terminal polls grow the interval; failed fetches retry at
/// the current interval without growing it.
#[derive(Debug, Clone)]
pub struct PollSession {
    config: PollConfig,
    interval: Duration,
    elapsed: Duration,
    consecutive_failures: u32,
}

impl PollSession {
    pub fn new(config: PollConfig) -> Self {
        Self {
            interval: config.initial_interval,
            elapsed: Duration::ZERO,
            consecutive_failures: 0,
            config,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn timed_out(&self) -> bool {
        self.elapsed >= self.config.timeout
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Account for a non-terminal snapshot. Returns the wait before the next
    /// poll (the interval in effect before growth).
    pub fn advance(&mut self) -> Duration {
        let wait = self.interval;
        self.elapsed = self.elapsed.saturating_add(wait);
        self.interval = self.config.next_interval(wait);
        wait
    }

    /// Account for a failed fetch.
    pub fn record_failure(&mut self) -> RetryDecision {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.config.max_retries {
            return RetryDecision::GiveUp(self.consecutive_failures);
        }
        self.elapsed = self.elapsed.saturating_add(self.interval);
        RetryDecision::RetryAfter(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backoff_grows_by_half_and_caps() {
        let mut s = PollSession::new(PollConfig::default());
        let expected_ms = [500.0, 750.0, 1125.0, 1687.5, 2531.25, 3796.875, 5000.0, 5000.0];
        for (n, want) in expected_ms.iter().enumerate() {
            let formula = (500.0 * 1.5f64.powi(n as i32)).min(5000.0);
            assert_eq!(*want, formula);
            let got = s.interval().as_secs_f64() * 1000.0;
            assert!((got - want).abs() < 1e-6, "n={n}: got {got}ms want {want}ms");
            s.advance();
        }
    }

    #[test]
    fn advance_returns_old_interval_and_accumulates() {
        let mut s = PollSession::new(PollConfig::default());
        assert_eq!(s.advance(), Duration::from_millis(500));
        assert_eq!(s.advance(), Duration::from_millis(750));
        assert_eq!(s.elapsed(), Duration::from_millis(1250));
    }

    #[test]
    fn failures_do_not_grow_interval() {
        let mut s = PollSession::new(PollConfig::default());
        assert_eq!(
            s.record_failure(),
            RetryDecision::RetryAfter(Duration::from_millis(500))
        );
        assert_eq!(
            s.record_failure(),
            RetryDecision::RetryAfter(Duration::from_millis(500))
        );
        assert_eq!(s.interval(), Duration::from_millis(500));
        assert_eq!(s.elapsed(), Duration::from_millis(1000));
        assert_eq!(s.record_failure(), RetryDecision::GiveUp(3));
    }

    #[test]
    fn success_resets_failure_count() {
        let mut s = PollSession::new(PollConfig::default());
        s.record_failure();
        s.record_failure();
        s.record_success();
        assert_eq!(s.consecutive_failures(), 0);
        assert!(matches!(s.record_failure(), RetryDecision::RetryAfter(_)));
    }

    #[test]
    fn timeout_is_interval_budget() {
        let cfg = PollConfig {
            timeout: Duration::from_millis(1200),
            ..PollConfig::default()
        };
        let mut s = PollSession::new(cfg);
        s.advance();
        assert!(!s.timed_out());
        s.advance();
        assert!(s.timed_out());
    }

    #[test]
    fn degenerate_multiplier_keeps_interval_fixed() {
        let cfg = PollConfig {
            backoff_multiplier: f64::NAN,
            ..PollConfig::default()
        };
        let mut s = PollSession::new(cfg);
        s.advance();
        assert_eq!(s.interval(), Duration::from_millis(500));
    }
}
