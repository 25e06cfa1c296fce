//! Field-error accumulator used by every request validator.
//!
//! Validators never stop at the first problem: each failed check is recorded
//! against its field so a single response can report every invalid input.
//! Only the first message per field is kept.

use serde::Serialize;

use crate::error::CoreError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collects [`FieldError`]s in the order they were first reported.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no check has failed so far.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` against `field` unless the field already has an error.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        if self.errors.iter().any(|e| e.field == field) {
            return;
        }
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Record `message` against `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Convert the accumulated state into a result.
    ///
    /// Returns [`CoreError::InvalidFields`] carrying every recorded failure.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self.errors))
        }
    }
}
