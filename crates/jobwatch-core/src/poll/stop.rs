//! Stop signal shared between a poll session task and its handle.
//!
//! The session checks the flag before every fetch and again after the fetch
//! returns, before any hook runs, so a stop that lands while a request is in
//! flight suppresses that request's dispatch. A sleeping session is woken
//! through the `Notify` so it exits without waiting out its interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Debug, Default)]
pub(crate) struct StopSignal {
    stopped: AtomicBool,
    wake: Notify,
}

impl StopSignal {
    /// Mark stopped. Returns true only for the call that flipped the flag.
    pub(crate) fn stop(&self) -> bool {
        let first = !self.stopped.swap(true, Ordering::SeqCst);
        if first {
            // notify_one stores a permit if the session is not sleeping yet.
            self.wake.notify_one();
        }
        first
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sleep for `delay`. Returns false if stopped before or during the wait.
    pub(crate) async fn sleep(&self, delay: Duration) -> bool {
        if self.is_stopped() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => !self.is_stopped(),
            _ = self.wake.notified() => false,
        }
    }
}

/// Cloneable handle that can stop a session from anywhere (another task, a
/// signal handler) without owning its `PollHandle`.
#[derive(Debug, Clone)]
pub struct Stopper {
    pub(crate) signal: Arc<StopSignal>,
}

impl Stopper {
    /// Halt local polling. Idempotent; does not contact the server.
    pub fn stop(&self) {
        self.signal.stop();
    }

    /// False once stopped or once the session reached a terminal outcome.
    pub fn is_active(&self) -> bool {
        !self.signal.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let s = StopSignal::default();
        assert!(s.stop());
        assert!(!s.stop());
        assert!(s.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_wakes_sleeper() {
        let s = Arc::new(StopSignal::default());
        let sleeper = tokio::spawn({
            let s = Arc::clone(&s);
            async move { s.sleep(Duration::from_secs(3600)).await }
        });
        tokio::task::yield_now().await;
        s.stop();
        assert!(!sleeper.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_when_not_stopped() {
        let s = StopSignal::default();
        assert!(s.sleep(Duration::from_millis(500)).await);
    }
}
