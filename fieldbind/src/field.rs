//! Runtime-driven field handle.
//!
//! [`Field`] wraps a [`Binder`] in shared state and pairs it with a
//! [`FieldDriver`], the one future that owns the field's debounce timer.
//! Every change wakes the driver, which re-reads the deadline and sleeps
//! until it; re-arming is the cancellation, so at most one validation is
//! ever scheduled per field.
//!
//! # Example
//!
//! ```ignore
//! let email = Field::spawn(
//!     FieldConfig::new("").rules(signup::email_rules()),
//! );
//!
//! // Wire the input.
//! let binding = email.bind();
//! binding.on_change("someone@example");
//!
//! // Later, after the quiet period:
//! if let Some(msg) = email.error().message() {
//!     show_below_input(msg);
//! }
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::binder::{Binder, Snapshot};
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::wakeup::{WakeupHandle, WakeupSender};

/// Unique identifier for a field instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__field_{}", self.0)
    }
}

/// State shared between handles and the driver.
#[derive(Debug)]
struct FieldInner {
    id: FieldId,
    binder: Mutex<Binder>,
    /// Wakes the driver after a change or close.
    changed: Notify,
    closed: AtomicBool,
    wakeup: WakeupHandle,
}

impl FieldInner {
    /// Lock the binder. A panicking rule poisons the lock mid-validation;
    /// the value is already stored by then, so the state is still usable.
    fn binder(&self) -> MutexGuard<'_, Binder> {
        self.binder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deadline(&self) -> Option<Instant> {
        self.binder().deadline()
    }

    fn poll(&self, now: Instant) -> bool {
        self.binder().poll(now)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.binder().cancel();
            self.changed.notify_one();
        }
    }
}

/// Closes the field when the last handle goes away.
#[derive(Debug)]
struct Lifetime(Arc<FieldInner>);

impl Drop for Lifetime {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// A debounced, rule-validated text field.
///
/// Cheap to clone; clones share state. When the last clone is dropped the
/// driver stops.
#[derive(Debug, Clone)]
pub struct Field {
    inner: Arc<FieldInner>,
    _lifetime: Arc<Lifetime>,
}

impl Field {
    /// Create a field and the driver that runs its validations.
    ///
    /// The driver must be polled (usually spawned) for debounced validation
    /// to happen. See [`Field::spawn`].
    pub fn new(config: FieldConfig) -> (Self, FieldDriver) {
        let inner = Arc::new(FieldInner {
            id: FieldId::new(),
            binder: Mutex::new(Binder::new(config)),
            changed: Notify::new(),
            closed: AtomicBool::new(false),
            wakeup: WakeupHandle::new(),
        });
        let field = Self {
            inner: Arc::clone(&inner),
            _lifetime: Arc::new(Lifetime(Arc::clone(&inner))),
        };
        (field, FieldDriver { inner })
    }

    /// Create a field and spawn its driver on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(config: FieldConfig) -> Self {
        let (field, driver) = Self::new(config);
        tokio::spawn(driver.run());
        field
    }

    /// Get the unique ID for this field.
    pub fn id(&self) -> FieldId {
        self.inner.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Latest raw value.
    pub fn value(&self) -> String {
        self.inner.binder().value().to_string()
    }

    /// Error from the most recent validation; empty when valid.
    pub fn error(&self) -> FieldError {
        self.inner.binder().error().clone()
    }

    /// Whether a validation is scheduled.
    pub fn is_pending(&self) -> bool {
        self.inner.binder().is_pending()
    }

    /// Copy out the observable state.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.binder().snapshot()
    }

    /// What an input element needs: the current value and a change handler.
    ///
    /// Pure read; calling it repeatedly without new events yields equal
    /// bindings.
    pub fn bind(&self) -> Binding {
        Binding {
            id: self.id(),
            value: self.value(),
            field: self.clone(),
        }
    }

    /// Whether the field has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Apply a change event: store the value now and reschedule validation.
    ///
    /// A closed field only stores the value.
    pub fn on_change(&self, value: impl Into<String>) {
        if self.is_closed() {
            self.inner.binder().store(value);
            return;
        }

        let validated = {
            let mut guard = self.inner.binder();
            let before = guard.validations();
            guard.on_change(value, Instant::now());
            guard.validations() != before
        };

        if validated {
            self.inner.wakeup.send(self.id());
        }
        self.inner.changed.notify_one();
    }

    /// Replace the value programmatically, cancelling any pending
    /// validation and clearing the error.
    pub fn set(&self, value: impl Into<String>) {
        self.inner.binder().set(value);
        self.inner.changed.notify_one();
    }

    /// Clear the value. Shorthand for `set("")`.
    pub fn clear(&self) {
        self.set("");
    }

    /// Cancel the pending timer and validate the current value now.
    pub fn validate_now(&self) -> FieldError {
        let error = self.inner.binder().validate_now().clone();
        self.inner.wakeup.send(self.id());
        self.inner.changed.notify_one();
        error
    }

    /// Report validations on `sender`.
    pub fn set_wakeup(&self, sender: WakeupSender) {
        self.inner.wakeup.install(sender);
    }

    /// Stop the driver and drop any pending validation. The field keeps its
    /// value and error and still echoes changes, but only validates when
    /// asked via [`Field::validate_now`].
    pub fn close(&self) {
        self.inner.close();
    }
}

/// The props a text input needs from its field.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Field the binding belongs to.
    pub id: FieldId,
    /// Value to display.
    pub value: String,
    field: Field,
}

impl Binding {
    /// Change handler: forward a new raw value to the field.
    pub fn on_change(&self, value: impl Into<String>) {
        self.field.on_change(value);
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value == other.value
    }
}

impl Eq for Binding {}

/// Future that owns a field's debounce timer.
///
/// Runs until the field is closed or every handle is dropped.
#[derive(Debug)]
pub struct FieldDriver {
    inner: Arc<FieldInner>,
}

impl FieldDriver {
    /// Drive debounced validation for the field.
    pub async fn run(self) {
        let inner = self.inner;
        debug!("field {}: driver started", inner.id);

        loop {
            if inner.closed.load(Ordering::SeqCst) {
                break;
            }

            match inner.deadline() {
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {
                            if inner.poll(Instant::now()) {
                                inner.wakeup.send(inner.id);
                            }
                        }
                        _ = inner.changed.notified() => {}
                    }
                }
                None => inner.changed.notified().await,
            }
        }

        debug!("field {}: driver stopped", inner.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let (a, _da) = Field::new(FieldConfig::default());
        let (b, _db) = Field::new(FieldConfig::default());
        assert_ne!(a.id(), b.id());
        assert!(a.id().to_string().starts_with("__field_"));
    }

    #[test]
    fn test_clones_share_state() {
        let (field, _driver) = Field::new(FieldConfig::new("x"));
        let other = field.clone();
        other.set("y");
        assert_eq!(field.value(), "y");
        assert_eq!(field.id(), other.id());
    }

    #[test]
    fn test_dropping_last_handle_closes() {
        let (field, driver) = Field::new(FieldConfig::default());
        let clone = field.clone();
        drop(field);
        assert!(!driver.inner.closed.load(Ordering::SeqCst));
        drop(clone);
        assert!(driver.inner.closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_binding_is_idempotent() {
        let (field, _driver) = Field::new(FieldConfig::new("hello"));
        let first = field.bind();
        let second = field.bind();
        assert_eq!(first, second);
        assert_eq!(first.value, "hello");
    }
}
