//! Validator trait and builders.
//!
//! - `Validate` trait for request types
//! - `FieldValidator` for building field-level validation chains
//! - `RequestValidator` for validating entire request objects

use crate::validation::error::{ValidationErrorKind, ValidationErrors, ValidationResult};
use crate::validation::rules::ValidationRule;

// ═══════════════════════════════════════════════════════════════════════════════
// Validate Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for types that can be validated.
pub trait Validate {
    /// Validate this object and return every validation error found.
    fn validate(&self) -> ValidationResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating a single field with multiple rules.
pub struct FieldValidator<'a, T> {
    field_name: &'a str,
    value: &'a T,
    errors: Vec<ValidationErrorKind>,
    stop_on_first_error: bool,
}

impl<'a, T> FieldValidator<'a, T> {
    pub fn new(field_name: &'a str, value: &'a T) -> Self {
        Self {
            field_name,
            value,
            errors: Vec::new(),
            stop_on_first_error: false,
        }
    }

    /// Stop validation on the first error (fail-fast mode).
    pub fn stop_on_first(mut self) -> Self {
        self.stop_on_first_error = true;
        self
    }

    /// Apply a validation rule.
    pub fn rule<R: ValidationRule<T>>(mut self, rule: R) -> Self {
        if self.stop_on_first_error && !self.errors.is_empty() {
            return self;
        }

        if let Some(error) = rule.validate(self.value) {
            self.errors.push(error);
        }
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Request Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// Collects errors from several fields; every field is checked.
#[derive(Default)]
pub struct RequestValidator {
    errors: ValidationErrors,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a field and collect any errors.
    pub fn field<T>(mut self, validator: FieldValidator<'_, T>) -> Self {
        for error in validator.errors {
            self.errors.add(validator.field_name, error);
        }
        self
    }

    pub fn merge(mut self, other: ValidationErrors) -> Self {
        self.errors.merge(other);
        self
    }

    /// Ok(()) if no errors, Err(errors) otherwise.
    pub fn result(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Create a FieldValidator for a field.
pub fn validate_field<'a, T>(field_name: &'a str, value: &'a T) -> FieldValidator<'a, T> {
    FieldValidator::new(field_name, value)
}

/// Create a new RequestValidator.
pub fn validate_request() -> RequestValidator {
    RequestValidator::new()
}
