//! Single-deadline debouncer.
//!
//! Holds at most one pending deadline. Arming replaces whatever was pending,
//! so a burst of events collapses into one firing `window` after the last.

use std::time::Duration;

use tokio::time::Instant;

/// Roughly 30 years; stands in for windows that overflow `Instant`.
pub const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Cancel-and-reschedule debounce state.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// The configured quiet window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Re-arm: drop any pending deadline and schedule one at `now + window`.
    ///
    /// Windows too large to represent are clamped to [`FAR_FUTURE`].
    pub fn arm(&mut self, now: Instant) -> Instant {
        let deadline = now
            .checked_add(self.window)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.deadline = Some(deadline);
        deadline
    }

    /// Drop the pending deadline, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// The pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed at `now`.
    ///
    /// Returns `true` exactly once per armed deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_after_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(t0);

        assert!(!debouncer.fire(t0 + Duration::from_millis(499)));
        assert!(debouncer.fire(t0 + WINDOW));
        assert!(!debouncer.fire(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_rearm_pushes_deadline() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(t0);
        debouncer.arm(t0 + Duration::from_millis(100));
        let last = debouncer.arm(t0 + Duration::from_millis(150));

        assert_eq!(last, t0 + Duration::from_millis(650));
        assert!(!debouncer.fire(t0 + Duration::from_millis(600)));
        assert!(debouncer.fire(t0 + Duration::from_millis(650)));
    }

    #[test]
    fn test_max_window_clamps() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::MAX);

        assert_eq!(debouncer.arm(t0), t0 + FAR_FUTURE);
        assert!(debouncer.is_pending());
        assert!(!debouncer.fire(t0 + Duration::from_secs(86400 * 365)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(t0);
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert!(!debouncer.fire(t0 + WINDOW));
    }
}
