//! Field-level input validation.
//!
//! Request bodies are deserialized into structs whose fields are all
//! optional, then checked field by field so a single response can list
//! every problem at once instead of stopping at the first missing field.

use serde::Serialize;

use skybook_core::Price;

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field (camelCase).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

/// Every field violation found while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationErrors {
    message: String,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Start collecting errors for an input; `message` is the summary line
    /// shown to clients (e.g. "Invalid booking data").
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// An error for one field.
    #[must_use]
    pub fn single(
        message: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let mut errors = Self::new(message);
        errors.add(field, reason);
        errors
    }

    /// Record a violation.
    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: reason.into(),
        });
    }

    /// The summary message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The recorded field violations.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if `field` has at least one violation.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Finish validation: `Ok(value)` if nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any violation was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        // Every required field passed, so the builder has what it needs.
        value().ok_or(self)
    }

    /// Require a value to be present.
    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "Required");
        }
        value
    }

    /// Require a string to be present and non-blank. The text itself is
    /// returned untrimmed.
    pub fn non_empty(&mut self, field: &str, label: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(s) if !s.trim().is_empty() => Some(s),
            Some(_) => {
                self.add(field, format!("{label} is required"));
                None
            }
            None => {
                self.add(field, "Required");
                None
            }
        }
    }

    /// Check an optional patch string: absent is fine, blank is not.
    pub fn non_empty_if_present(&mut self, field: &str, label: &str, value: Option<&String>) {
        if value.is_some_and(|s| s.trim().is_empty()) {
            self.add(field, format!("{label} cannot be empty"));
        }
    }

    /// Check a money amount: not negative and no larger than [`Price::MAX`].
    /// Absent amounts pass; pair with [`required`](Self::required) when the
    /// field is mandatory.
    pub fn amount_in_range(&mut self, field: &str, label: &str, value: Option<Price>) {
        let Some(amount) = value else {
            return;
        };
        if amount.is_negative() {
            self.add(field, format!("{label} cannot be negative"));
        } else if amount.exceeds_max() {
            self.add(field, format!("{label} cannot exceed {}", Price::MAX));
        }
    }
}
