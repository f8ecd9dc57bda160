//! Outbound Request Rate Limiter
//!
//! Enforces a dual sliding-window cap (requests per minute and requests per
//! hour) shared across every network-bound research call. `reserve()` may
//! suspend the caller; it never fails. Waiters resume in FIFO order because
//! the window state sits behind a `tokio::sync::Mutex` held across the wait.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Dual sliding-window rate limiter.
///
/// Two timestamp lists are maintained, one per window, pruned of entries
/// older than their window on every call. Both caps are checked (and waited
/// on) before the pending call is recorded in both lists.
pub struct RateLimiter {
    state: Mutex<Windows>,
    per_minute_cap: usize,
    per_hour_cap: usize,
    minute_window: Duration,
    hour_window: Duration,
}

struct Windows {
    minute: VecDeque<Instant>,
    hour: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a limiter with the standard 60 s / 3600 s windows
    pub fn new(per_minute_cap: u32, per_hour_cap: u32) -> Self {
        Self::with_windows(
            per_minute_cap,
            per_hour_cap,
            Duration::from_secs(60),
            Duration::from_secs(3600),
        )
    }

    /// Create a limiter with explicit window durations (shortened in tests)
    fn with_windows(
        per_minute_cap: u32,
        per_hour_cap: u32,
        minute_window: Duration,
        hour_window: Duration,
    ) -> Self {
        Self {
            state: Mutex::new(Windows {
                minute: VecDeque::new(),
                hour: VecDeque::new(),
            }),
            per_minute_cap: per_minute_cap as usize,
            per_hour_cap: per_hour_cap as usize,
            minute_window,
            hour_window,
        }
    }

    /// Reserve one outbound call slot, suspending until neither window cap
    /// would be exceeded. The slot is recorded in both windows only after
    /// both checks pass.
    pub async fn reserve(&self) {
        let mut state = self.state.lock().await;

        loop {
            let now = Instant::now();
            Self::prune(&mut state.minute, now, self.minute_window);
            Self::prune(&mut state.hour, now, self.hour_window);

            // Minute cap first, hour cap after (both re-checked on wake)
            if state.minute.len() >= self.per_minute_cap {
                let oldest = state.minute[0];
                let wait = self.minute_window.saturating_sub(now - oldest);
                tracing::debug!(wait_ms = wait.as_millis() as u64, "Per-minute cap reached, waiting");
                tokio::time::sleep(wait).await;
                continue;
            }

            if state.hour.len() >= self.per_hour_cap {
                let oldest = state.hour[0];
                let wait = self.hour_window.saturating_sub(now - oldest);
                tracing::info!(wait_ms = wait.as_millis() as u64, "Per-hour cap reached, waiting");
                tokio::time::sleep(wait).await;
                continue;
            }

            state.minute.push_back(now);
            state.hour.push_back(now);
            return;
        }
    }

    fn prune(window: &mut VecDeque<Instant>, now: Instant, span: Duration) {
        while let Some(&front) = window.front() {
            if now - front >= span {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_under_cap_does_not_wait() {
        let limiter = RateLimiter::with_windows(
            3,
            10,
            Duration::from_millis(300),
            Duration::from_millis(1000),
        );

        let start = Instant::now();
        limiter.reserve().await;
        limiter.reserve().await;
        limiter.reserve().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_minute_cap_suspends_until_oldest_ages_out() {
        let limiter = RateLimiter::with_windows(
            2,
            10,
            Duration::from_millis(300),
            Duration::from_millis(2000),
        );

        let start = Instant::now();
        limiter.reserve().await;
        limiter.reserve().await;
        // Third call must wait for the first entry to leave the window
        limiter.reserve().await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_hour_cap_checked_after_minute_cap() {
        let limiter = RateLimiter::with_windows(
            10,
            2,
            Duration::from_millis(100),
            Duration::from_millis(500),
        );

        let start = Instant::now();
        limiter.reserve().await;
        limiter.reserve().await;
        // Minute window is wide open; the long window must still gate
        limiter.reserve().await;
        assert!(start.elapsed() >= Duration::from_millis(450));
    }

    #[tokio::test]
    async fn test_window_never_exceeds_cap() {
        let limiter = RateLimiter::with_windows(
            3,
            100,
            Duration::from_millis(200),
            Duration::from_millis(2000),
        );

        // Issue more reserves than the cap; timestamps inside any trailing
        // window must never exceed the cap.
        for _ in 0..7 {
            limiter.reserve().await;
            let state = limiter.state.lock().await;
            assert!(state.minute.len() <= 3);
        }
    }
}
