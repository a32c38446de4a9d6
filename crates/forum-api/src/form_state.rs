//! The error payload returned by form actions instead of a redirect.
//!
//! Serialized as `{ "errors": { "<field>": [..], "_form": [..] } }`, with
//! absent keys omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// Key holding errors that are not tied to a single field
pub const FORM_KEY: &str = "_form";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub errors: FormErrors,
}

impl FormState {
    /// A state carrying a single form-level message
    pub fn form_error(message: impl Into<String>) -> Self {
        let mut errors = FormErrors::default();
        errors.push(FORM_KEY, message);
        Self { errors }
    }
}

impl From<FormErrors> for FormState {
    fn from(errors: FormErrors) -> Self {
        Self { errors }
    }
}

/// Field name to ordered list of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn form(&self) -> Option<&[String]> {
        self.field(FORM_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = Self::default();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                form_errors.push(field.to_string(), message);
            }
        }

        form_errors
    }
}
