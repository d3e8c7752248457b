//! Validation rules.
//!
//! A rule pairs a check with the message shown when the check fails. A
//! field's rules are evaluated in declared order and the first failure wins.
//!
//! # Example
//!
//! ```
//! use fieldbind::rule::{ValidationRule, first_failure};
//!
//! let rules = vec![
//!     ValidationRule::pattern(r"^.{8,}$", "Password is too short").unwrap(),
//!     ValidationRule::pattern(r"[0-9]+", "must contain at least one number").unwrap(),
//! ];
//!
//! assert_eq!(first_failure(&rules, "abc"), Some("Password is too short"));
//! assert_eq!(first_failure(&rules, "abcdefgh"), Some("must contain at least one number"));
//! assert_eq!(first_failure(&rules, "abcdefg1"), None);
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{FieldError, RuleError};

/// Boxed predicate used by custom rules.
type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
enum Check {
    Pattern(Regex),
    Predicate(Predicate),
}

/// A check paired with a human-readable error message.
///
/// Cheap to clone; predicates are shared.
#[derive(Clone)]
pub struct ValidationRule {
    check: Check,
    message: String,
}

impl ValidationRule {
    /// Create a rule from a custom predicate. The rule passes when `f`
    /// returns `true`.
    pub fn new<F>(f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Check::Predicate(Arc::new(f)),
            message: msg.into(),
        }
    }

    /// Create a rule that passes when the value matches `pattern`.
    pub fn pattern(pattern: &str, msg: impl Into<String>) -> Result<Self, RuleError> {
        let re = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::regex(re, msg))
    }

    /// Create a rule from an already compiled regex.
    pub fn regex(re: Regex, msg: impl Into<String>) -> Self {
        Self {
            check: Check::Pattern(re),
            message: msg.into(),
        }
    }

    /// Require a non-blank value.
    pub fn required(msg: impl Into<String>) -> Self {
        Self::new(|v| !v.trim().is_empty(), msg)
    }

    /// Require at least `min` characters.
    pub fn min_length(min: usize, msg: impl Into<String>) -> Self {
        Self::new(move |v| v.chars().count() >= min, msg)
    }

    /// Require at most `max` characters.
    pub fn max_length(max: usize, msg: impl Into<String>) -> Self {
        Self::new(move |v| v.chars().count() <= max, msg)
    }

    /// Require a valid email address. Empty values pass; combine with
    /// [`ValidationRule::required`] to reject them.
    pub fn email(msg: impl Into<String>) -> Self {
        Self::new(
            |v| v.is_empty() || email_address::EmailAddress::is_valid(v),
            msg,
        )
    }

    /// Require the value to contain `substr`.
    pub fn contains(substr: impl Into<String>, msg: impl Into<String>) -> Self {
        let substr = substr.into();
        Self::new(move |v| v.contains(&substr), msg)
    }

    /// Require the value to equal `other`.
    pub fn equals(other: impl Into<String>, msg: impl Into<String>) -> Self {
        let other = other.into();
        Self::new(move |v| v == other, msg)
    }

    /// The message surfaced when this rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if `value` satisfies this rule.
    pub fn passes(&self, value: &str) -> bool {
        match &self.check {
            Check::Pattern(re) => re.is_match(value),
            Check::Predicate(f) => f(value),
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = match &self.check {
            Check::Pattern(re) => re.as_str().to_string(),
            Check::Predicate(_) => "<predicate>".to_string(),
        };
        f.debug_struct("ValidationRule")
            .field("check", &check)
            .field("message", &self.message)
            .finish()
    }
}

/// Message of the first rule `value` fails, or `None` if every rule passes.
pub fn first_failure<'a>(rules: &'a [ValidationRule], value: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| !rule.passes(value))
        .map(ValidationRule::message)
}

/// Evaluate `rules` in order and produce the field error for `value`.
pub fn evaluate(rules: &[ValidationRule], value: &str) -> FieldError {
    first_failure(rules, value)
        .map(FieldError::new)
        .unwrap_or_default()
}
