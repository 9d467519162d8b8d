//! Route table.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, AppState};

/// Build the campus router (without state or middleware).
///
/// # Endpoints
///
/// ## Events
/// - `GET /events` - List events, newest first
/// - `POST /events` - Create an event
/// - `GET /events/:id` - Get one event
/// - `GET /events/:id/registrations` - Registrations for an event with student details
///
/// ## Students
/// - `GET /students` - List students by name
/// - `POST /students` - Create a student
/// - `GET /students/:id` - Get one student
///
/// ## Participation
/// - `POST /registrations` - Register a student for an event
/// - `POST /attendance` - Mark a registered student as attended
/// - `POST /feedback` - Submit feedback for an attended event
///
/// ## Reports
/// - `GET /reports/event-popularity`
/// - `GET /reports/attendance`
/// - `GET /reports/feedback`
/// - `GET /reports/top-students`
/// - `GET /reports/student-participation/:id`
///
/// ## System
/// - `POST /init-db` - Load the sample dataset once
/// - `GET /health`
/// - `GET /metrics` - Prometheus exposition
pub fn campus_router() -> Router<AppState> {
    Router::new()
        // Events
        .route(paths::EVENTS, get(handlers::list_events).post(handlers::create_event))
        .route(paths::EVENT, get(handlers::get_event))
        .route(paths::EVENT_REGISTRATIONS, get(handlers::event_registrations))
        // Students
        .route(paths::STUDENTS, get(handlers::list_students).post(handlers::create_student))
        .route(paths::STUDENT, get(handlers::get_student))
        // Participation
        .route(paths::REGISTRATIONS, post(handlers::create_registration))
        .route(paths::ATTENDANCE, post(handlers::mark_attendance))
        .route(paths::FEEDBACK, post(handlers::submit_feedback))
        // Reports
        .route(paths::REPORT_EVENT_POPULARITY, get(handlers::event_popularity_report))
        .route(paths::REPORT_ATTENDANCE, get(handlers::attendance_report))
        .route(paths::REPORT_FEEDBACK, get(handlers::feedback_report))
        .route(paths::REPORT_TOP_STUDENTS, get(handlers::top_students_report))
        .route(
            paths::REPORT_STUDENT_PARTICIPATION,
            get(handlers::student_participation_report),
        )
        // System
        .route(paths::INIT_DB, post(handlers::init_db))
        .route(paths::HEALTH, get(handlers::health_check))
        .route(paths::METRICS, get(handlers::prometheus_metrics))
}

/// Route constants for use in clients and tests.
pub mod paths {
    pub const EVENTS: &str = "/events";
    pub const EVENT: &str = "/events/:id";
    pub const EVENT_REGISTRATIONS: &str = "/events/:id/registrations";

    pub const STUDENTS: &str = "/students";
    pub const STUDENT: &str = "/students/:id";

    pub const REGISTRATIONS: &str = "/registrations";
    pub const ATTENDANCE: &str = "/attendance";
    pub const FEEDBACK: &str = "/feedback";

    pub const REPORT_EVENT_POPULARITY: &str = "/reports/event-popularity";
    pub const REPORT_ATTENDANCE: &str = "/reports/attendance";
    pub const REPORT_FEEDBACK: &str = "/reports/feedback";
    pub const REPORT_TOP_STUDENTS: &str = "/reports/top-students";
    pub const REPORT_STUDENT_PARTICIPATION: &str = "/reports/student-participation/:id";

    pub const INIT_DB: &str = "/init-db";
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";
}
