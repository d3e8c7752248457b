//! Synchronous binder state machine.
//!
//! `Binder` owns a field's value, its current error and its debounce state.
//! Time is passed in explicitly, so the machine can be driven by a runtime
//! timer ([`crate::Field`]) or stepped by hand.

use log::{debug, trace};
use tokio::time::Instant;

use crate::config::FieldConfig;
use crate::debounce::Debouncer;
use crate::error::FieldError;
use crate::rule::{self, ValidationRule};

/// Owned copy of a binder's observable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Latest raw value.
    pub value: String,
    /// Error from the most recent validation.
    pub error: FieldError,
    /// Whether a validation is scheduled.
    pub pending: bool,
    /// Number of validations run so far.
    pub validations: u64,
}

/// Value, error and debounce state for one text field.
#[derive(Debug)]
pub struct Binder {
    value: String,
    error: FieldError,
    rules: Vec<ValidationRule>,
    debouncer: Debouncer,
    validations: u64,
}

impl Binder {
    /// Create a binder. The initial value is not validated until the first
    /// change or an explicit [`Binder::validate_now`].
    pub fn new(config: FieldConfig) -> Self {
        Self {
            value: config.initial,
            error: FieldError::none(),
            rules: config.rules,
            debouncer: Debouncer::new(config.debounce),
            validations: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Latest raw value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Error from the most recent validation.
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The rules this binder evaluates.
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// When the pending validation is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Whether a validation is scheduled.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Number of validations run so far.
    pub fn validations(&self) -> u64 {
        self.validations
    }

    /// Copy out the observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            value: self.value.clone(),
            error: self.error.clone(),
            pending: self.is_pending(),
            validations: self.validations,
        }
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Apply a change event at `now`.
    ///
    /// The value is stored immediately. Validation is rescheduled to one
    /// window after `now`, replacing any pending one; with a zero window it
    /// runs right away. Returns the new deadline, if one was armed.
    pub fn on_change(&mut self, value: impl Into<String>, now: Instant) -> Option<Instant> {
        self.value = value.into();

        if self.debouncer.window().is_zero() {
            self.debouncer.cancel();
            self.validate();
            return None;
        }

        let deadline = self.debouncer.arm(now);
        trace!(
            "binder: re-armed validation for {:?}",
            deadline.saturating_duration_since(now)
        );
        Some(deadline)
    }

    /// Run the pending validation if its deadline has passed at `now`.
    ///
    /// Returns `true` if validation ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debouncer.fire(now) {
            self.validate();
            true
        } else {
            false
        }
    }

    /// Store a value without scheduling validation or touching the error.
    pub fn store(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Drop the pending validation, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Replace the value programmatically.
    ///
    /// Cancels any pending validation and clears the error; the new value is
    /// not judged until the next change or [`Binder::validate_now`].
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.debouncer.cancel();
        self.error = FieldError::none();
    }

    /// Cancel the pending timer and validate the current value now.
    pub fn validate_now(&mut self) -> &FieldError {
        self.debouncer.cancel();
        self.validate();
        &self.error
    }

    fn validate(&mut self) {
        self.error = rule::evaluate(&self.rules, &self.value);
        self.validations += 1;
        debug!(
            "binder: validation #{} -> {}",
            self.validations,
            self.error.message().unwrap_or("ok")
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn too_short() -> FieldConfig {
        FieldConfig::new("")
            .debounce_ms(500)
            .rule(ValidationRule::pattern(r"^.{8,}$", "too short").unwrap())
    }

    #[test]
    fn test_value_echoes_immediately() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short());

        binder.on_change("a", t0);
        assert_eq!(binder.value(), "a");
        binder.on_change("ab", t0 + ms(10));
        assert_eq!(binder.value(), "ab");
        assert!(binder.error().is_empty());
        assert_eq!(binder.validations(), 0);
    }

    #[test]
    fn test_validates_after_quiet_period() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short());

        binder.on_change("abc", t0);
        assert!(!binder.poll(t0 + ms(499)));
        assert!(binder.poll(t0 + ms(600)));
        assert_eq!(binder.error(), "too short");
    }

    #[test]
    fn test_burst_coalesces_into_one_validation() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short());

        binder.on_change("a", t0);
        binder.on_change("ab", t0 + ms(100));
        binder.on_change("abcdefgh", t0 + ms(150));

        assert!(!binder.poll(t0 + ms(600)));
        assert_eq!(binder.validations(), 0);
        assert!(binder.poll(t0 + ms(650)));
        assert!(!binder.poll(t0 + ms(2000)));
        assert_eq!(binder.validations(), 1);
        assert!(binder.error().is_empty());
    }

    #[test]
    fn test_zero_window_validates_synchronously() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short().debounce_ms(0));

        assert_eq!(binder.on_change("abc", t0), None);
        assert_eq!(binder.error(), "too short");
        assert!(!binder.is_pending());
        assert_eq!(binder.validations(), 1);
    }

    #[test]
    fn test_set_cancels_and_clears() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short());
        binder.on_change("abc", t0);
        binder.poll(t0 + ms(500));
        binder.on_change("abcd", t0 + ms(600));

        binder.set("");
        assert_eq!(binder.value(), "");
        assert!(binder.error().is_empty());
        assert!(!binder.is_pending());
        assert!(!binder.poll(t0 + ms(5000)));
    }

    #[test]
    fn test_validate_now_flushes() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short());
        binder.on_change("abc", t0);

        assert_eq!(binder.validate_now(), "too short");
        assert!(!binder.is_pending());
        assert!(!binder.poll(t0 + ms(500)));
        assert_eq!(binder.validations(), 1);
    }

    #[test]
    fn test_store_and_cancel() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short());
        binder.on_change("abc", t0);
        binder.poll(t0 + ms(500));

        binder.on_change("abcd", t0 + ms(600));
        assert!(binder.cancel());
        assert!(!binder.cancel());
        binder.store("abcdefgh");

        assert_eq!(binder.value(), "abcdefgh");
        assert_eq!(binder.error(), "too short");
        assert!(!binder.poll(t0 + ms(5000)));
    }

    #[test]
    fn test_rules_keep_config_order() {
        let binder = Binder::new(
            FieldConfig::new("")
                .rule(ValidationRule::required("required"))
                .rule(ValidationRule::max_length(3, "too long")),
        );
        let messages: Vec<&str> = binder.rules().iter().map(|r| r.message()).collect();
        assert_eq!(messages, vec!["required", "too long"]);
    }

    #[test]
    fn test_max_window_does_not_overflow() {
        let t0 = Instant::now();
        let mut binder = Binder::new(too_short().debounce(Duration::MAX));

        assert!(binder.on_change("abc", t0).is_some());
        assert_eq!(binder.value(), "abc");
        assert!(!binder.poll(t0 + Duration::from_secs(86400)));
        assert_eq!(binder.validate_now(), "too short");
    }

    #[test]
    fn test_snapshot() {
        let t0 = Instant::now();
        let mut binder = Binder::new(FieldConfig::new("seed"));
        binder.on_change("seed2", t0);

        let snapshot = binder.snapshot();
        assert_eq!(snapshot.value, "seed2");
        assert!(snapshot.pending);
        assert_eq!(snapshot.validations, 0);
        assert_eq!(snapshot, binder.snapshot());
    }
}
