//! Signup form preset.
//!
//! First name, last name, email, password and a confirmation, each bound
//! with a 500 ms window. Submission only produces the payload; sending it is
//! up to the caller.

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::FieldConfig;
use crate::field::Field;
use crate::form::{FieldIssue, Form, ValidationResult};
use crate::rule::ValidationRule;

/// Debounce window used by every signup field, in milliseconds.
pub const SIGNUP_DEBOUNCE_MS: u64 = 500;

/// Names the signup fields are registered under.
pub mod names {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM: &str = "password_confirm";
}

/// Errors returned by [`SignupForm::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// At least one field blocks submission.
    #[error("Credentials are not valid!")]
    Invalid(Vec<FieldIssue>),

    /// The payload could not be encoded.
    #[error("Failed to encode signup payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Body sent to the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupPayload {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, SubmitError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn rule(pattern: &str, msg: &str) -> ValidationRule {
    let re = Regex::new(pattern).expect("Invalid built-in pattern");
    ValidationRule::regex(re, msg)
}

/// Rules for the email field.
pub fn email_rules() -> Vec<ValidationRule> {
    vec![rule(r"^\S+@\S+\.\S+$", "Email is invalid")]
}

/// Rules for the password field, in reporting order.
pub fn password_rules() -> Vec<ValidationRule> {
    vec![
        rule(r"^.{8,}$", "Password is too short"),
        rule(r"[A-Z]+", "must contain at least one uppercase character"),
        rule(r"[a-z]+", "must contain at least one lowercase character"),
        rule(r"[0-9]+", "must contain at least one number"),
    ]
}

/// The signup form.
#[derive(Debug)]
pub struct SignupForm {
    pub first_name: Field,
    pub last_name: Field,
    pub email: Field,
    pub password: Field,
    pub confirm: Field,
    form: Form,
}

impl SignupForm {
    /// Build the form, spawning each field's driver on the current tokio
    /// runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn() -> Self {
        let base = || FieldConfig::new("").debounce_ms(SIGNUP_DEBOUNCE_MS);

        let first_name = Field::spawn(base());
        let last_name = Field::spawn(base());
        let email = Field::spawn(base().rules(email_rules()));
        let password = Field::spawn(base().rules(password_rules()));
        let confirm = Field::spawn(base());

        let form = Form::new()
            .field(names::FIRST_NAME, first_name.clone())
            .field(names::LAST_NAME, last_name.clone())
            .field(names::EMAIL, email.clone())
            .field(names::PASSWORD, password.clone())
            .field(names::CONFIRM, confirm.clone())
            .required(names::FIRST_NAME, "Name is required")
            .required(names::LAST_NAME, "Last name is required")
            .required(names::EMAIL, "Email is required")
            .required(names::PASSWORD, "Password is required")
            .required(names::CONFIRM, "Please confirm your password")
            .matches(names::CONFIRM, names::PASSWORD, "Password doesn't match");

        Self {
            first_name,
            last_name,
            email,
            password,
            confirm,
            form,
        }
    }

    /// The underlying form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Live error for the confirmation field, shown as the user types.
    pub fn confirm_error(&self) -> Option<String> {
        self.form.mismatch(names::CONFIRM)
    }

    /// Flush pending validations and check the whole form.
    pub fn check(&self) -> ValidationResult {
        self.form.flush();
        self.form.check()
    }

    /// Validate everything and build the payload.
    pub fn submit(&self) -> Result<SignupPayload, SubmitError> {
        match self.check() {
            ValidationResult::Valid => {
                log::info!("signup: form valid, payload ready");
                Ok(SignupPayload {
                    first_name: self.first_name.value(),
                    last_name: self.last_name.value(),
                    email: self.email.value(),
                    password: self.password.value(),
                })
            }
            ValidationResult::Invalid(issues) => {
                log::debug!("signup: {} field(s) block submission", issues.len());
                Err(SubmitError::Invalid(issues))
            }
        }
    }

    /// Clear every field.
    pub fn reset(&self) {
        for field in [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm,
        ] {
            field.clear();
        }
    }

    /// Stop every field's driver.
    pub fn close(&self) {
        self.form.close();
    }
}
