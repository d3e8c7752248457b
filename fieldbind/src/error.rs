//! Error types.

use std::fmt;

/// Errors raised while building validation rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule's pattern is not a valid regular expression.
    #[error("Invalid rule pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// Underlying regex compile error.
        #[source]
        source: regex::Error,
    },
}

/// The validation error currently shown for a field.
///
/// Empty means the field has no error. Validation failures are data, not
/// Rust errors: they are rendered beneath the field and never propagated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldError(String);

impl FieldError {
    /// No error.
    pub fn none() -> Self {
        Self::default()
    }

    /// An error carrying the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The message, or `""` when there is no error.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when there is no error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message, if any.
    pub fn message(&self) -> Option<&str> {
        if self.0.is_empty() { None } else { Some(&self.0) }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for FieldError {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldError {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        let error = FieldError::none();
        assert!(error.is_empty());
        assert_eq!(error.as_str(), "");
        assert_eq!(error.message(), None);
    }

    #[test]
    fn test_message() {
        let error = FieldError::new("too short");
        assert!(!error.is_empty());
        assert_eq!(error.message(), Some("too short"));
        assert_eq!(error, "too short");
        assert_eq!(error.to_string(), "too short");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let error = RuleError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(error.to_string().contains("Invalid rule pattern '('"));
    }
}
