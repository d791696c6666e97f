//! Configuration validation

use crate::address::Address;

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Value is required but missing
    #[error("Field '{field}' is required but missing")]
    Required {
        /// Dotted field path
        field: String,
    },
    /// Value has the wrong shape
    #[error("Field '{field}' has invalid format. Expected: {expected}, got: {actual}")]
    InvalidFormat {
        /// Dotted field path
        field: String,
        /// Expected format
        expected: String,
        /// Offending value
        actual: String,
    },
    /// Custom rule failed
    #[error("Field '{field}': {message}")]
    Custom {
        /// Dotted field path
        field: String,
        /// Failure description
        message: String,
    },
}

/// Accumulates field errors while walking a configuration.
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
    field_prefix: String,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator for a nested section
    pub fn for_field(&self, field_name: &str) -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: self.full_field_name(field_name),
        }
    }

    /// String must be non-empty after trimming
    pub fn non_empty(&mut self, field_name: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required {
                field: self.full_field_name(field_name),
            });
        }
        self
    }

    /// String must be an http(s) URL
    pub fn url(&mut self, field_name: &str, value: &str) -> &mut Self {
        let valid = value.starts_with("http://") || value.starts_with("https://");
        if !valid {
            self.errors.push(ValidationError::InvalidFormat {
                field: self.full_field_name(field_name),
                expected: "http(s) URL".to_string(),
                actual: value.to_string(),
            });
        }
        self
    }

    /// Address must not be the zero address
    pub fn non_zero_address(&mut self, field_name: &str, value: &Address) -> &mut Self {
        if value.is_zero() {
            self.errors.push(ValidationError::Custom {
                field: self.full_field_name(field_name),
                message: "must not be the zero address".to_string(),
            });
        }
        self
    }

    /// Validate using a custom predicate
    pub fn custom<T, F>(&mut self, field_name: &str, value: &T, predicate: F, message: &str) -> &mut Self
    where
        F: FnOnce(&T) -> bool,
    {
        if !predicate(value) {
            self.errors.push(ValidationError::Custom {
                field: self.full_field_name(field_name),
                message: message.to_string(),
            });
        }
        self
    }

    /// Merge errors from a nested validator
    pub fn merge(&mut self, other: ConfigValidator) {
        self.errors.extend(other.errors);
    }

    /// All accumulated errors
    pub fn all_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    fn full_field_name(&self, field_name: &str) -> String {
        if self.field_prefix.is_empty() {
            field_name.to_string()
        } else {
            format!("{}.{}", self.field_prefix, field_name)
        }
    }
}
