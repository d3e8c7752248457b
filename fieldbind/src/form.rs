//! Form-level aggregation of field errors.
//!
//! Each field reports its own error. A [`Form`] collects named fields and
//! decides whether the whole form may be submitted: it reports the field's
//! own error, then a missing required value, then a mismatch against
//! another field.
//!
//! # Example
//!
//! ```ignore
//! let form = Form::new()
//!     .field("password", password.clone())
//!     .required("password", "Password is required")
//!     .field("confirm", confirm.clone())
//!     .matches("confirm", "password", "Password doesn't match");
//!
//! form.flush();
//! let result = form.check();
//! if let Some(issue) = result.first_error() {
//!     println!("{}: {}", issue.field_name, issue.message);
//! }
//! ```

use std::collections::BTreeMap;

use crate::field::{Field, FieldId};

/// A field that blocks submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Name the field was registered under.
    pub field_name: String,
    /// Field ID (for focusing).
    pub field_id: FieldId,
    /// Error message.
    pub message: String,
}

/// Result of checking a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every field may be submitted.
    #[default]
    Valid,
    /// One or more fields block submission.
    Invalid(Vec<FieldIssue>),
}

impl ValidationResult {
    /// Check if all fields passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any field failed.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// All issues, in field registration order.
    pub fn errors(&self) -> &[FieldIssue] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// The first issue, if any.
    pub fn first_error(&self) -> Option<&FieldIssue> {
        self.errors().first()
    }

    /// Issue reported for `name`, if any.
    pub fn error_for(&self, name: &str) -> Option<&FieldIssue> {
        self.errors().iter().find(|e| e.field_name == name)
    }
}

#[derive(Debug)]
struct Entry {
    name: String,
    field: Field,
    required: Option<String>,
    matches: Option<(String, String)>,
}

/// Named fields plus the form-level checks between them.
#[derive(Debug, Default)]
pub struct Form {
    entries: Vec<Entry>,
}

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field. Re-registering a name replaces the field and keeps
    /// its checks and position.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match self.entry_mut(&name) {
            Some(entry) => entry.field = field,
            None => self.entries.push(Entry {
                name,
                field,
                required: None,
                matches: None,
            }),
        }
        self
    }

    /// Require `name` to be non-blank at submission. Unknown names are
    /// ignored.
    pub fn required(mut self, name: &str, msg: impl Into<String>) -> Self {
        if let Some(entry) = self.entry_mut(name) {
            entry.required = Some(msg.into());
        }
        self
    }

    /// Require `name` to equal `other` whenever `name` is non-empty.
    pub fn matches(mut self, name: &str, other: impl Into<String>, msg: impl Into<String>) -> Self {
        if let Some(entry) = self.entry_mut(name) {
            entry.matches = Some((other.into(), msg.into()));
        }
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.field)
    }

    /// Registered names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Current values by name.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.field.value()))
            .collect()
    }

    /// Validate every field now instead of waiting for its quiet period.
    pub fn flush(&self) {
        for entry in &self.entries {
            entry.field.validate_now();
        }
    }

    /// Mismatch message for `name`, if its match check fails.
    pub fn mismatch(&self, name: &str) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.name == name)?;
        self.mismatch_of(entry)
    }

    /// Decide whether the form may be submitted.
    ///
    /// Uses each field's current error as-is; call [`Form::flush`] first to
    /// judge values still inside their debounce window.
    pub fn check(&self) -> ValidationResult {
        let mut errors = Vec::new();

        for entry in &self.entries {
            if let Some(message) = self.issue_of(entry) {
                errors.push(FieldIssue {
                    field_name: entry.name.clone(),
                    field_id: entry.field.id(),
                    message,
                });
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    /// Close every field's driver.
    pub fn close(&self) {
        for entry in &self.entries {
            entry.field.close();
        }
    }

    fn issue_of(&self, entry: &Entry) -> Option<String> {
        if let Some(msg) = entry.field.error().message() {
            return Some(msg.to_string());
        }

        if let Some(msg) = &entry.required
            && entry.field.value().trim().is_empty()
        {
            return Some(msg.clone());
        }

        self.mismatch_of(entry)
    }

    fn mismatch_of(&self, entry: &Entry) -> Option<String> {
        let (other, msg) = entry.matches.as_ref()?;
        let value = entry.field.value();
        if value.is_empty() {
            return None;
        }
        let other = self.get(other)?;
        if value != other.value() {
            Some(msg.clone())
        } else {
            None
        }
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }
}
