#![allow(clippy::result_large_err)]
//! # Campus Core
//!
//! Event management for a university campus: events, students,
//! registrations, attendance and feedback, plus the reports built on them.
//!
//! ## Architecture
//!
//! - **Store** ([`db`]): in-memory record collections behind a shared [`db::Database`] handle
//! - **Reports** ([`reports`]): popularity, attendance, feedback and top-student aggregates
//! - **API** ([`api`]): axum router, handlers and middleware
//! - **Validation** ([`validation`]): request field rules and lenient coercion
//! - **Telemetry** ([`telemetry`]): structured logging and Prometheus metrics

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod reports;
pub mod telemetry;
pub mod validation;

pub use error::{CampusError, ErrorCode, ErrorDetails, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{build_router, AppState};
    pub use crate::db::models::{
        Attendance, Event, EventId, Feedback, NewEvent, NewStudent, Registration, Student,
        StudentId,
    };
    pub use crate::db::{Database, RecordStore};
    pub use crate::error::{CampusError, ErrorCode, Result};
    pub use crate::reports::{
        AttendanceRate, EventPopularity, FeedbackAverage, StudentParticipation, TopStudent,
    };
}
