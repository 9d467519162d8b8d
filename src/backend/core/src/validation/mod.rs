//! Request validation.
//!
//! - **Rules**: presence, integer coercion, numeric ranges, email and
//!   timestamp formats
//! - **Validators**: the `Validate` trait plus `FieldValidator` and
//!   `RequestValidator` builders that collect every failing field
//! - **Coercion**: lenient parsing of numeric strings and date-times
//!
//! # Example
//!
//! ```rust,ignore
//! use campus_core::validation::{
//!     validate_field, validate_request, Email, RequiredString, Validate, ValidationResult,
//! };
//!
//! impl Validate for CreateStudentRequest {
//!     fn validate(&self) -> ValidationResult<()> {
//!         validate_request()
//!             .field(validate_field("email", &self.email).rule(RequiredString).rule(Email))
//!             .result()
//!     }
//! }
//! ```

pub mod coerce;
pub mod error;
pub mod rules;
pub mod validator;

pub use coerce::{coerce_integer, parse_timestamp};
pub use error::{OptionExt, ValidationErrorKind, ValidationErrors, ValidationResult};
pub use rules::{Email, Integer, Min, Range, RequiredOption, RequiredString, Timestamp, ValidationRule};
pub use validator::{validate_field, validate_request, FieldValidator, RequestValidator, Validate};
