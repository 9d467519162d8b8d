//! Validation error types with field-level error support.
//!
//! Errors are grouped by field name and kept in field order, so a response
//! listing every failing field is stable across runs.

use std::collections::BTreeMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Error Kinds
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of validation error that occurred. `Display` is the message
/// clients see under `details.fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Field is required but was missing or empty.
    Required,
    /// Numeric value is below the minimum.
    MinValue { min: i64, actual: i64 },
    /// Value must be within a range.
    Range { min: i64, max: i64, actual: i64 },
    /// Value does not match the expected email format.
    InvalidEmail,
    /// Value is neither an integer nor a string holding one.
    InvalidInteger,
    /// Value is not a recognised date-time.
    InvalidTimestamp,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::MinValue { min, actual } => {
                write!(f, "must be at least {} (got {})", min, actual)
            }
            Self::Range { min, max, actual } => {
                write!(f, "must be between {} and {} (got {})", min, max, actual)
            }
            Self::InvalidEmail => write!(f, "must be a valid email address"),
            Self::InvalidInteger => write!(f, "must be an integer"),
            Self::InvalidTimestamp => {
                write!(f, "must be a date-time such as 2024-03-15T09:00:00")
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Errors Collection
// ═══════════════════════════════════════════════════════════════════════════════

/// Validation failures organized by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<ValidationErrorKind>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, field: impl Into<String>, kind: ValidationErrorKind) {
        self.errors.entry(field.into()).or_default().push(kind);
    }

    pub fn add_required(&mut self, field: impl Into<String>) {
        self.add(field, ValidationErrorKind::Required);
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    /// Field name to error messages, as rendered in API error details.
    pub fn to_message_map(&self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .iter()
            .map(|(field, errors)| (field.clone(), errors.iter().map(ToString::to_string).collect()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.errors {
            for kind in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, kind)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Result Type
// ═══════════════════════════════════════════════════════════════════════════════

/// Result type for validation operations.
pub type ValidationResult<T> = std::result::Result<T, ValidationErrors>;

/// Extension trait for converting Option to ValidationResult.
pub trait OptionExt<T> {
    /// Convert None to a required field error.
    fn required(self, field: &str) -> ValidationResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn required(self, field: &str) -> ValidationResult<T> {
        self.ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add_required(field);
            errors
        })
    }
}
