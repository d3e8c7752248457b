//! Field configuration.

use std::time::Duration;

use crate::rule::ValidationRule;

/// Default quiet window before validation runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Per-field configuration.
///
/// # Example
///
/// ```
/// use fieldbind::{FieldConfig, ValidationRule};
///
/// let config = FieldConfig::new("")
///     .debounce_ms(300)
///     .rule(ValidationRule::required("Name is required"));
/// assert_eq!(config.rules.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Value the field starts with.
    pub initial: String,

    /// How long input must be quiet before rules are evaluated.
    /// Zero validates on every change.
    pub debounce: Duration,

    /// Rules, evaluated in order; the first failure is reported.
    pub rules: Vec<ValidationRule>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            initial: String::new(),
            debounce: DEFAULT_DEBOUNCE,
            rules: Vec::new(),
        }
    }
}

impl FieldConfig {
    /// Create a config with the given initial value.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
            ..Default::default()
        }
    }

    /// Set the initial value.
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = value.into();
        self
    }

    /// Set the debounce window.
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Set the debounce window in milliseconds.
    pub fn debounce_ms(mut self, millis: u64) -> Self {
        self.debounce = Duration::from_millis(millis);
        self
    }

    /// Append a rule.
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules, keeping their order.
    pub fn rules(mut self, rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        self.rules.extend(rules);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.initial, "");
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_initial_overrides_constructor_value() {
        let config = FieldConfig::new("draft").initial("final");
        assert_eq!(config.initial, "final");
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
    }

    #[test]
    fn test_builder_keeps_rule_order() {
        let config = FieldConfig::new("x")
            .debounce_ms(250)
            .rule(ValidationRule::required("first"))
            .rules([
                ValidationRule::min_length(2, "second"),
                ValidationRule::max_length(4, "third"),
            ]);

        assert_eq!(config.initial, "x");
        assert_eq!(config.debounce, Duration::from_millis(250));
        let messages: Vec<&str> = config.rules.iter().map(|r| r.message()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }
}
