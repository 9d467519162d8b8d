//! Validation rules for request fields.
//!
//! Rules on `Option<_>` skip absent values; pair them with [`RequiredString`]
//! or [`RequiredOption`] when the field must be present. Numeric rules on
//! `Option<Value>` coerce first and stay silent when coercion fails, leaving
//! that report to [`Integer`].

use crate::validation::coerce::{coerce_integer, parse_timestamp};
use crate::validation::error::ValidationErrorKind;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// ═══════════════════════════════════════════════════════════════════════════════
// Pre-compiled Regex Patterns
// ═══════════════════════════════════════════════════════════════════════════════

/// Email validation regex (RFC 5322 simplified).
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).expect("Invalid email regex")
});

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Rule Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// A check applied to one field value. Returns the failure, if any.
pub trait ValidationRule<T> {
    fn validate(&self, value: &T) -> Option<ValidationErrorKind>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Presence Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates an optional field is present (Some).
#[derive(Debug, Clone)]
pub struct RequiredOption;

impl<T> ValidationRule<Option<T>> for RequiredOption {
    fn validate(&self, value: &Option<T>) -> Option<ValidationErrorKind> {
        value.is_none().then_some(ValidationErrorKind::Required)
    }
}

/// Rule that validates an optional string is present and non-blank.
#[derive(Debug, Clone)]
pub struct RequiredString;

impl ValidationRule<Option<String>> for RequiredString {
    fn validate(&self, value: &Option<String>) -> Option<ValidationErrorKind> {
        match value {
            Some(s) if !s.trim().is_empty() => None,
            _ => Some(ValidationErrorKind::Required),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Numeric Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates a value coerces to an integer.
#[derive(Debug, Clone)]
pub struct Integer;

impl ValidationRule<Option<Value>> for Integer {
    fn validate(&self, value: &Option<Value>) -> Option<ValidationErrorKind> {
        let value = value.as_ref()?;
        coerce_integer(value)
            .is_none()
            .then_some(ValidationErrorKind::InvalidInteger)
    }
}

/// Rule that validates a minimum on a coerced integer. Values that do not
/// coerce are left to [`Integer`].
#[derive(Debug, Clone)]
pub struct Min(pub i64);

impl ValidationRule<Option<Value>> for Min {
    fn validate(&self, value: &Option<Value>) -> Option<ValidationErrorKind> {
        let actual = value.as_ref().and_then(coerce_integer)?;
        (actual < self.0).then_some(ValidationErrorKind::MinValue { min: self.0, actual })
    }
}

/// Rule that validates a coerced integer is within an inclusive range.
#[derive(Debug, Clone)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl ValidationRule<Option<Value>> for Range {
    fn validate(&self, value: &Option<Value>) -> Option<ValidationErrorKind> {
        let actual = value.as_ref().and_then(coerce_integer)?;
        (actual < self.min || actual > self.max).then_some(ValidationErrorKind::Range {
            min: self.min,
            max: self.max,
            actual,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Format Validation Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates email format. Blank values pass; presence is
/// [`RequiredString`]'s job.
#[derive(Debug, Clone, Default)]
pub struct Email;

impl ValidationRule<Option<String>> for Email {
    fn validate(&self, value: &Option<String>) -> Option<ValidationErrorKind> {
        let s = value.as_deref()?.trim();
        (!s.is_empty() && !EMAIL_REGEX.is_match(s)).then_some(ValidationErrorKind::InvalidEmail)
    }
}

/// Rule that validates a string parses as a timestamp.
#[derive(Debug, Clone, Default)]
pub struct Timestamp;

impl ValidationRule<Option<String>> for Timestamp {
    fn validate(&self, value: &Option<String>) -> Option<ValidationErrorKind> {
        let s = value.as_deref()?;
        if s.trim().is_empty() {
            return None;
        }
        parse_timestamp(s)
            .is_none()
            .then_some(ValidationErrorKind::InvalidTimestamp)
    }
}
