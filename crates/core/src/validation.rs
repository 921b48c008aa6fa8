//! Field-level form errors.
//!
//! Form cleaning functions return `Result<Clean, FieldErrors>`. Errors are
//! keyed by form field name; errors that belong to no single field use
//! [`NON_FIELD_ERRORS`].

use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Key for errors not attached to a specific field.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// PostgreSQL text columns cannot hold `\0`.
pub const NULL_CHARACTERS_MESSAGE: &str = "Null characters are not allowed.";

/// Ordered map of field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field` (empty when the field is valid).
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", err.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Record [`NULL_CHARACTERS_MESSAGE`] for every `(field, raw value)` pair
/// that contains a NUL character.
pub fn reject_null_characters(fields: &[(&str, &str)], errors: &mut FieldErrors) {
    for (field, raw) in fields {
        if raw.contains('\0') {
            errors.add(*field, NULL_CHARACTERS_MESSAGE);
        }
    }
}

/// Trim a submitted text field.
pub fn clean_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Trim a submitted text field, mapping blank input to `None`.
pub fn clean_optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
