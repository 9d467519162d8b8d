//! Error handling for the campus service.
//!
//! This module provides:
//! - A single [`CampusError`] type carrying a machine-readable [`ErrorCode`]
//! - HTTP status code mapping for API responses
//! - Error logging with tracing integration, graded by severity
//! - Metrics integration for error tracking
//!
//! # Usage
//!
//! ```rust,ignore
//! use campus_core::error::{CampusError, Result};
//!
//! fn find(id: u64) -> Result<Event> {
//!     store.event(id).cloned().ok_or_else(|| CampusError::not_found("Event", id.to_string()))
//! }
//! ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

use crate::validation::ValidationErrors;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for campus operations.
pub type Result<T> = std::result::Result<T, CampusError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes for API responses.
///
/// These codes are stable and can be used by clients for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Store Errors (2000-2099)
    RecordNotFound,
    DuplicateRecord,

    // Serialization Errors (2200-2299)
    InvalidJson,

    // Validation Errors (4100-4199)
    ValidationError,
    InvalidInput,
    UnsupportedMediaType,

    // Configuration Errors (5000-5099)
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::RecordNotFound => 2004,
            Self::DuplicateRecord => 2005,
            Self::InvalidJson => 2202,
            Self::ValidationError => 4100,
            Self::InvalidInput => 4101,
            Self::UnsupportedMediaType => 4104,
            Self::ConfigurationError => 5000,
        }
    }

    /// Get the HTTP status code for this error.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateRecord => StatusCode::CONFLICT,
            Self::InvalidJson | Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error category for grouping.
    pub const fn category(&self) -> &'static str {
        match self.numeric_code() {
            2000..=2099 => "store",
            2200..=2299 => "serialization",
            4100..=4199 => "validation",
            5000..=5099 => "configuration",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Severity
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity level for errors (affects logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Client errors: bad input, missing records, duplicates
    Low,
    /// System errors such as a broken configuration
    High,
}

impl ErrorSeverity {
    /// Get severity based on error code.
    pub const fn from_code(code: &ErrorCode) -> Self {
        match code {
            ErrorCode::RecordNotFound
            | ErrorCode::DuplicateRecord
            | ErrorCode::InvalidJson
            | ErrorCode::ValidationError
            | ErrorCode::InvalidInput
            | ErrorCode::UnsupportedMediaType => Self::Low,

            ErrorCode::ConfigurationError => Self::High,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Details
// ═══════════════════════════════════════════════════════════════════════════════

/// Additional structured details about an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Additional context key-value pairs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,

    /// Per-field validation messages
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,

    /// Related entity type (event, student)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Related entity ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl ErrorDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
            && self.fields.is_empty()
            && self.entity_type.is_none()
            && self.entity_id.is_none()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// The error type for every fallible campus operation.
///
/// Carries a stable [`ErrorCode`], a message that is safe to show clients,
/// an optional internal message that is only logged, and structured details.
#[derive(Error, Debug)]
pub struct CampusError {
    /// Machine-readable error code
    code: ErrorCode,

    /// User-friendly error message (safe to expose to clients)
    user_message: Cow<'static, str>,

    /// Detailed internal message (for logging only)
    internal_message: Option<String>,

    /// Additional structured details
    details: ErrorDetails,

    /// The source error that caused this error
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for CampusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.user_message)?;
        if let Some(ref internal) = self.internal_message {
            write!(f, " (internal: {})", internal)?;
        }
        Ok(())
    }
}

impl CampusError {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new error with code and user message.
    pub fn new(code: ErrorCode, user_message: impl Into<Cow<'static, str>>) -> Self {
        let error = Self {
            code,
            user_message: user_message.into(),
            internal_message: None,
            details: ErrorDetails::default(),
            source: None,
        };
        error.record_metrics();
        error
    }

    /// Create an error with both user and internal messages.
    pub fn with_internal(
        code: ErrorCode,
        user_message: impl Into<Cow<'static, str>>,
        internal_message: impl Into<String>,
    ) -> Self {
        let mut error = Self::new(code, user_message);
        error.internal_message = Some(internal_message.into());
        error
    }

    /// Create a not found error.
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self::new(
            ErrorCode::RecordNotFound,
            format!("{} not found: {}", entity_type, entity_id),
        )
        .with_details(ErrorDetails::new().with_entity(entity_type, entity_id))
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create a conflict error for a record that already exists.
    pub fn duplicate(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::DuplicateRecord, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::with_internal(
            ErrorCode::ConfigurationError,
            "Configuration error",
            message,
        )
    }

    /// Create a validation error listing every failing field.
    pub fn from_validation(errors: ValidationErrors) -> Self {
        let details = ErrorDetails {
            fields: errors.to_message_map(),
            ..ErrorDetails::default()
        };
        Self::with_internal(ErrorCode::ValidationError, "Validation failed", errors.to_string())
            .with_details(details)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Add error details.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = details;
        self
    }

    /// Add context to details.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.details.context.insert(key.into(), v);
        }
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn internal_message(&self) -> Option<&str> {
        self.internal_message.as_deref()
    }

    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::from_code(&self.code)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    /// Log this error with appropriate severity.
    pub fn log(&self) {
        let code = self.code.to_string();
        let category = self.code.category();
        let status = self.http_status().as_u16();

        match self.severity() {
            ErrorSeverity::High => {
                error!(
                    error_code = %code,
                    category = category,
                    http_status = status,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    source = ?self.source,
                    "High severity error"
                );
            }
            ErrorSeverity::Low => {
                debug!(
                    error_code = %code,
                    category = category,
                    http_status = status,
                    user_message = %self.user_message,
                    "Request rejected"
                );
            }
        }
    }

    fn record_metrics(&self) {
        counter!(
            "campus_errors_total",
            "code" => self.code.to_string(),
            "category" => self.code.category(),
        )
        .increment(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// API Response
// ═══════════════════════════════════════════════════════════════════════════════

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,

    pub error: ErrorInfo,
}

/// Error information for API responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Machine-readable error code
    pub code: ErrorCode,

    pub numeric_code: u32,

    /// User-friendly error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,

    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<&CampusError> for ErrorResponse {
    fn from(error: &CampusError) -> Self {
        Self {
            success: false,
            error: ErrorInfo {
                code: error.code,
                numeric_code: error.code.numeric_code(),
                message: error.user_message.to_string(),
                details: (!error.details.is_empty()).then(|| error.details.clone()),
                timestamp: chrono::Utc::now(),
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Axum Integration
// ═══════════════════════════════════════════════════════════════════════════════

impl IntoResponse for CampusError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.http_status();
        let response = ErrorResponse::from(&self);

        (status, Json(response)).into_response()
    }
}

impl From<JsonRejection> for CampusError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match rejection {
            JsonRejection::MissingJsonContentType(_) => ErrorCode::UnsupportedMediaType,
            _ => ErrorCode::InvalidJson,
        };
        Self::with_internal(code, "Request body is not valid JSON", rejection.body_text())
    }
}

impl From<PathRejection> for CampusError {
    fn from(rejection: PathRejection) -> Self {
        Self::with_internal(
            ErrorCode::InvalidInput,
            "Path parameter must be a positive integer id",
            rejection.body_text(),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════════════════

impl From<config::ConfigError> for CampusError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::RecordNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::DuplicateRecord.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InvalidJson.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ValidationError.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::ConfigurationError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(ErrorCode::RecordNotFound.category(), "store");
        assert_eq!(ErrorCode::ValidationError.category(), "validation");
        assert_eq!(ErrorCode::ConfigurationError.category(), "configuration");
    }

    #[test]
    fn test_not_found_carries_entity() {
        let err = CampusError::not_found("Event", "42");
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
        assert_eq!(err.user_message(), "Event not found: 42");
        assert_eq!(err.details().entity_type.as_deref(), Some("Event"));
        assert_eq!(err.details().entity_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_config_error_hides_internal_message() {
        let err = CampusError::from(config::ConfigError::Message("bad port value".to_string()));
        let response = ErrorResponse::from(&err);
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert_eq!(response.error.message, "Configuration error");
        assert_eq!(err.internal_message(), Some("bad port value"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = CampusError::duplicate("Email already exists").with_context("email", "a@b.in");
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "DUPLICATE_RECORD");
        assert_eq!(json["error"]["numeric_code"], 2005);
        assert_eq!(json["error"]["message"], "Email already exists");
        assert_eq!(json["error"]["details"]["context"]["email"], "a@b.in");
    }

    #[test]
    fn test_empty_details_are_omitted() {
        let err = CampusError::validation("bad");
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert!(json["error"].get("details").is_none());
    }

    #[test]
    fn test_from_validation_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add_required("name");
        errors.add("year", ValidationErrorKind::InvalidInteger);

        let err = CampusError::from_validation(errors);
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(err.details().fields.contains_key("name"));
        assert_eq!(err.details().fields["year"], vec!["must be an integer"]);
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(CampusError::validation("x").severity(), ErrorSeverity::Low);
        assert_eq!(CampusError::configuration("x").severity(), ErrorSeverity::High);
        assert_eq!(CampusError::not_found("Event", "1").severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_error_display() {
        let err = CampusError::configuration("missing file");
        assert_eq!(
            err.to_string(),
            "[ConfigurationError] Configuration error (internal: missing file)"
        );
    }
}
