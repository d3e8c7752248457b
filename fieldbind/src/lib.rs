//! Debounced, rule-validated text field bindings.
//!
//! A [`Field`] echoes every change immediately and validates the value
//! against an ordered rule list once input has been quiet for the
//! configured window. The first failing rule's message becomes the field's
//! error. [`Form`] aggregates fields for submission.

pub mod binder;
pub mod config;
pub mod debounce;
pub mod error;
pub mod field;
pub mod form;
pub mod rule;
pub mod signup;
pub mod wakeup;

pub use binder::{Binder, Snapshot};
pub use config::{DEFAULT_DEBOUNCE, FieldConfig};
pub use error::{FieldError, RuleError};
pub use field::{Binding, Field, FieldDriver, FieldId};
pub use form::{FieldIssue, Form, ValidationResult};
pub use rule::ValidationRule;

pub mod prelude {
    pub use crate::binder::Snapshot;
    pub use crate::config::FieldConfig;
    pub use crate::error::FieldError;
    pub use crate::field::{Binding, Field, FieldId};
    pub use crate::form::{Form, ValidationResult};
    pub use crate::rule::ValidationRule;
    pub use crate::signup::{SignupForm, SignupPayload, SubmitError};
    pub use crate::wakeup::{WakeupReceiver, WakeupSender};
}
