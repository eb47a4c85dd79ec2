//! Fixed-window admission counter guarding outbound API calls.
//!
//! The window is a two-state machine evaluated on every `allow()`:
//! within-window (count against `limit`) or expired (reset, then count).
//! No timers run in the background. Bursts of up to `2 * limit` across a
//! window boundary are possible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Default)]
struct Window {
    /// `None` until the first admission check.
    start: Option<Instant>,
    count: u32,
    last_admitted: Option<Instant>,
}

impl Window {
    fn is_expired(&self, now: Instant, interval: Duration) -> bool {
        match self.start {
            None => true,
            Some(start) => now.saturating_duration_since(start) >= interval,
        }
    }
}

/// Process-level limiter: at most `limit` admissions per `interval`.
pub struct FixedWindowLimiter {
    limit: u32,
    interval: Duration,
    window: Mutex<Window>,
    clock: Arc<dyn Clock>,
    rejected: AtomicU64,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, interval: Duration) -> Self {
        Self::with_clock(limit, interval, Arc::new(SystemClock))
    }

    pub fn with_clock(limit: u32, interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit,
            interval,
            window: Mutex::new(Window::default()),
            clock,
            rejected: AtomicU64::new(0),
        }
    }

    /// Admission check. `false` means "try later", never a hard failure.
    pub fn allow(&self) -> bool {
        let now = self.clock.now();

        // Poisoned mutex means logic bug; treat as "deny" instead of panic.
        let Ok(mut w) = self.window.lock() else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return false;
        };

        if w.is_expired(now, self.interval) {
            w.start = Some(now);
            w.count = 0;
        }

        if w.count < self.limit {
            w.count += 1;
            w.last_admitted = Some(now);
            return true;
        }

        let since_last_admitted_ms = w
            .last_admitted
            .map(|t| now.saturating_duration_since(t).as_millis() as u64);
        drop(w);
        self.rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            limit = self.limit,
            ?since_last_admitted_ms,
            "rate limiter window exhausted"
        );
        false
    }

    /// Instant of the most recent admission, if any.
    pub fn last_admitted(&self) -> Option<Instant> {
        self.window.lock().ok().and_then(|w| w.last_admitted)
    }

    /// Total rejected admission checks since construction.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(limit: u32, interval: Duration) -> (FixedWindowLimiter, ManualClock) {
        let clock = ManualClock::default();
        let lim = FixedWindowLimiter::with_clock(limit, interval, Arc::new(clock.clone()));
        (lim, clock)
    }

    #[test]
    fn admits_up_to_limit_then_rejects() {
        let (lim, _clock) = limiter(3, Duration::from_secs(60));
        assert!(lim.allow());
        assert!(lim.allow());
        assert!(lim.allow());
        assert!(!lim.allow());
        assert!(!lim.allow());
        assert_eq!(lim.rejected(), 2);
    }

    #[test]
    fn rejections_do_not_move_last_admitted() {
        let (lim, clock) = limiter(1, Duration::from_secs(60));
        assert_eq!(lim.last_admitted(), None);

        let first = clock.now();
        assert!(lim.allow());
        clock.advance(Duration::from_secs(5));
        assert!(!lim.allow());
        assert_eq!(lim.last_admitted(), Some(first));

        clock.advance(Duration::from_secs(55));
        assert!(lim.allow());
        assert_eq!(lim.last_admitted(), Some(clock.now()));
    }

    #[test]
    fn window_resets_after_interval() {
        let (lim, clock) = limiter(2, Duration::from_secs(60));
        assert!(lim.allow());
        assert!(lim.allow());
        assert!(!lim.allow());

        clock.advance(Duration::from_secs(59));
        assert!(!lim.allow());

        clock.advance(Duration::from_secs(1));
        assert!(lim.allow());
        assert!(lim.allow());
        assert!(!lim.allow());
    }

    #[test]
    fn reset_is_measured_from_window_start() {
        let (lim, clock) = limiter(2, Duration::from_secs(60));
        assert!(lim.allow());
        clock.advance(Duration::from_secs(50));
        assert!(lim.allow());

        // 60s after the first admission, not after the last one.
        clock.advance(Duration::from_secs(10));
        assert!(lim.allow());
    }

    #[test]
    fn boundary_burst_is_allowed() {
        let (lim, clock) = limiter(3, Duration::from_secs(60));
        assert!(lim.allow());
        clock.advance(Duration::from_millis(59_999));
        assert!(lim.allow());
        assert!(lim.allow());

        clock.advance(Duration::from_millis(1));
        assert!(lim.allow());
        assert!(lim.allow());
        assert!(lim.allow());
        assert!(!lim.allow());
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let (lim, _clock) = limiter(0, Duration::from_secs(1));
        assert!(!lim.allow());
    }
}
