//! Rolling-window rate limiting for outbound provider calls.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Error raised when the window's quota is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("quota exhausted: {count} of {quota} calls used in the current window")]
pub struct QuotaExceeded {
    /// Calls used in the current window.
    pub count: u32,
    /// Configured quota.
    pub quota: u32,
}

/// A rolling rate window: at most `quota` acquisitions per `window`.
///
/// Once a full window has elapsed since the window started, the counter
/// resets. The acquisition that would exceed the quota fails and does not
/// increment the counter, so the count never passes the quota.
#[derive(Debug)]
pub struct RateWindow {
    quota: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug)]
struct WindowState {
    count: u32,
    started: Instant,
}

impl RateWindow {
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            quota,
            window,
            state: Mutex::new(WindowState {
                count: 0,
                started: Instant::now(),
            }),
        }
    }

    /// Acquire one slot, or fail if the window's quota is exhausted.
    pub async fn try_acquire(&self) -> Result<(), QuotaExceeded> {
        self.try_acquire_at(Instant::now()).await
    }

    /// Acquire one slot using an explicit clock reading.
    ///
    /// Exposed so tests can drive window elapse without real waiting.
    pub async fn try_acquire_at(&self, now: Instant) -> Result<(), QuotaExceeded> {
        let mut state = self.state.lock().await;

        if now.duration_since(state.started) >= self.window {
            state.count = 0;
            state.started = now;
        }

        if state.count >= self.quota {
            return Err(QuotaExceeded {
                count: state.count,
                quota: self.quota,
            });
        }

        state.count += 1;
        Ok(())
    }

    /// Calls used in the current window.
    pub async fn used(&self) -> u32 {
        self.state.lock().await.count
    }
}
