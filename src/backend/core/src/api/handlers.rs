//! API request handlers.
//!
//! Handlers return `Result<impl IntoResponse, CampusError>` so that errors
//! are converted to HTTP status codes by the `IntoResponse` implementation on
//! `CampusError`.
//!
//! Request bodies are deserialized leniently (every field optional, numbers
//! accepted as strings) and then validated, so a malformed request reports
//! every failing field at once instead of the first serde error.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiJson, ApiPath, AppState};
use crate::db::models::{EventId, NewEvent, NewStudent, StudentId};
use crate::error::CampusError;
use crate::telemetry::MetricsRegistry;
use crate::validation::{
    coerce_integer, parse_timestamp, validate_field, validate_request, Email, Integer, Min,
    OptionExt, Range, RequiredOption, RequiredString, Timestamp, Validate, ValidationResult,
};

const STUDENT_YEARS: (i64, i64) = (1, 4);

/// Response body for every create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: u64,
    pub message: String,
}

impl Created {
    fn new(id: u64, message: &str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                id,
                message: message.to_string(),
            }),
        )
    }
}

/// Trimmed copy of a required string field.
fn required_text(value: Option<String>, field: &str) -> ValidationResult<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .required(field)
}

/// Coerced integer field that must fit in `T`.
fn required_int<T: TryFrom<i64>>(value: Option<&Value>, field: &str) -> ValidationResult<T> {
    value
        .and_then(coerce_integer)
        .and_then(|n| T::try_from(n).ok())
        .required(field)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Health Check & Metrics
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "counts": state.db.counts(),
    }))
}

pub async fn prometheus_metrics() -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        MetricsRegistry::global().render(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<Value>,
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(RequiredString))
            .field(validate_field("description", &self.description).rule(RequiredString))
            .field(
                validate_field("date", &self.date)
                    .stop_on_first()
                    .rule(RequiredString)
                    .rule(Timestamp),
            )
            .field(validate_field("location", &self.location).rule(RequiredString))
            .field(
                validate_field("capacity", &self.capacity)
                    .stop_on_first()
                    .rule(RequiredOption)
                    .rule(Integer)
                    .rule(Range::new(0, i64::from(u32::MAX))),
            )
            .result()
    }
}

impl CreateEventRequest {
    /// Validate and convert into a store insert.
    pub fn into_new_event(self) -> ValidationResult<NewEvent> {
        self.validate()?;
        Ok(NewEvent {
            date: self.date.as_deref().and_then(parse_timestamp).required("date")?,
            capacity: required_int(self.capacity.as_ref(), "capacity")?,
            name: required_text(self.name, "name")?,
            description: required_text(self.description, "description")?,
            location: required_text(self.location, "location")?,
        })
    }
}

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.db.list_events())
}

pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<impl IntoResponse, CampusError> {
    let new_event = req.into_new_event().map_err(CampusError::from_validation)?;
    let id = state.db.create_event(new_event);
    Ok(Created::new(id, "Event created successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EventId>,
) -> Result<impl IntoResponse, CampusError> {
    Ok(Json(state.db.get_event(id)?))
}

pub async fn event_registrations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EventId>,
) -> Result<impl IntoResponse, CampusError> {
    Ok(Json(state.db.event_registrations(id)?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Students
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub year: Option<Value>,
}

impl Validate for CreateStudentRequest {
    fn validate(&self) -> ValidationResult<()> {
        let (min_year, max_year) = STUDENT_YEARS;
        validate_request()
            .field(validate_field("name", &self.name).rule(RequiredString))
            .field(
                validate_field("email", &self.email)
                    .stop_on_first()
                    .rule(RequiredString)
                    .rule(Email),
            )
            .field(
                validate_field("year", &self.year)
                    .stop_on_first()
                    .rule(RequiredOption)
                    .rule(Integer)
                    .rule(Range::new(min_year, max_year)),
            )
            .result()
    }
}

impl CreateStudentRequest {
    pub fn into_new_student(self) -> ValidationResult<NewStudent> {
        self.validate()?;
        Ok(NewStudent {
            year: required_int(self.year.as_ref(), "year")?,
            name: required_text(self.name, "name")?,
            email: required_text(self.email, "email")?,
        })
    }
}

pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.db.list_students())
}

pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateStudentRequest>,
) -> Result<impl IntoResponse, CampusError> {
    let new_student = req.into_new_student().map_err(CampusError::from_validation)?;
    let id = state.db.create_student(new_student)?;
    Ok(Created::new(id, "Student created successfully"))
}

pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<impl IntoResponse, CampusError> {
    Ok(Json(state.db.get_student(id)?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registrations, Attendance, Feedback
// ═══════════════════════════════════════════════════════════════════════════════

/// Body of `POST /registrations` and `POST /attendance`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParticipationRequest {
    pub student_id: Option<Value>,
    pub event_id: Option<Value>,
}

impl Validate for ParticipationRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(
                validate_field("student_id", &self.student_id)
                    .stop_on_first()
                    .rule(RequiredOption)
                    .rule(Integer)
                    .rule(Min(1)),
            )
            .field(
                validate_field("event_id", &self.event_id)
                    .stop_on_first()
                    .rule(RequiredOption)
                    .rule(Integer)
                    .rule(Min(1)),
            )
            .result()
    }
}

impl ParticipationRequest {
    /// Validated `(student_id, event_id)`.
    pub fn ids(&self) -> ValidationResult<(StudentId, EventId)> {
        self.validate()?;
        Ok((
            required_int(self.student_id.as_ref(), "student_id")?,
            required_int(self.event_id.as_ref(), "event_id")?,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackRequest {
    pub student_id: Option<Value>,
    pub event_id: Option<Value>,
    pub score: Option<Value>,
    pub comments: Option<String>,
}

impl Validate for FeedbackRequest {
    fn validate(&self) -> ValidationResult<()> {
        let ids = ParticipationRequest {
            student_id: self.student_id.clone(),
            event_id: self.event_id.clone(),
        };
        let mut result = validate_request().field(
            validate_field("score", &self.score)
                .stop_on_first()
                .rule(RequiredOption)
                .rule(Integer)
                .rule(Range::new(1, 5)),
        );
        if let Err(errors) = ids.validate() {
            result = result.merge(errors);
        }
        result.result()
    }
}

pub async fn create_registration(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ParticipationRequest>,
) -> Result<impl IntoResponse, CampusError> {
    let (student_id, event_id) = req.ids().map_err(CampusError::from_validation)?;
    let id = state.db.register(student_id, event_id)?;
    Ok(Created::new(id, "Registration successful"))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ParticipationRequest>,
) -> Result<impl IntoResponse, CampusError> {
    let (student_id, event_id) = req.ids().map_err(CampusError::from_validation)?;
    let id = state.db.mark_attendance(student_id, event_id)?;
    Ok(Created::new(id, "Attendance marked successfully"))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> Result<impl IntoResponse, CampusError> {
    req.validate().map_err(CampusError::from_validation)?;
    let ids = ParticipationRequest {
        student_id: req.student_id,
        event_id: req.event_id,
    };
    let (student_id, event_id) = ids.ids().map_err(CampusError::from_validation)?;
    let score: u8 = required_int(req.score.as_ref(), "score").map_err(CampusError::from_validation)?;
    let comments = req.comments.map(|c| c.trim().to_string()).unwrap_or_default();

    let id = state.db.submit_feedback(student_id, event_id, score, comments)?;
    Ok(Created::new(id, "Feedback submitted successfully"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reports
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn event_popularity_report(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.db.event_popularity())
}

pub async fn attendance_report(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.db.attendance_rates())
}

pub async fn feedback_report(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.db.feedback_averages())
}

pub async fn top_students_report(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.db.top_students())
}

pub async fn student_participation_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<impl IntoResponse, CampusError> {
    Ok(Json(state.db.student_participation(id)?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Seeding
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
pub struct InitDbResponse {
    pub seeded: bool,
    pub message: String,
}

pub async fn init_db(State(state): State<AppState>) -> Result<impl IntoResponse, CampusError> {
    let seeded = state.db.seed()?;
    let message = if seeded {
        "Database initialized with sample data"
    } else {
        "Database already initialized"
    };
    Ok(Json(InitDbResponse {
        seeded,
        message: message.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_request(body: Value) -> CreateEventRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_event_request_coerces_fields() {
        let new_event = event_request(json!({
            "name": "  Hackathon ",
            "description": "24 hours",
            "date": "2024-05-01T09:00",
            "location": "Lab 3",
            "capacity": "80"
        }))
        .into_new_event()
        .unwrap();

        assert_eq!(new_event.name, "Hackathon");
        assert_eq!(new_event.capacity, 80);
        assert_eq!(new_event.date.to_string(), "2024-05-01 09:00:00");
    }

    #[test]
    fn test_event_request_reports_every_field() {
        let errors = event_request(json!({ "capacity": "lots" }))
            .into_new_event()
            .unwrap_err();

        let messages = errors.to_message_map();
        assert_eq!(
            messages.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["capacity", "date", "description", "location", "name"]
        );
        assert_eq!(messages["capacity"], vec!["must be an integer"]);
        assert_eq!(messages["name"], vec!["field is required"]);
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let errors = event_request(json!({
            "name": "n", "description": "d", "date": "2024-05-01T09:00:00",
            "location": "l", "capacity": -1
        }))
        .into_new_event()
        .unwrap_err();
        let messages = errors.to_message_map();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages["capacity"], vec!["must be between 0 and 4294967295 (got -1)"]);
    }

    #[test]
    fn test_student_request_year_bounds() {
        let parse = |year: Value| {
            serde_json::from_value::<CreateStudentRequest>(json!({
                "name": "Asha", "email": "asha@university.ac.in", "year": year
            }))
            .unwrap()
            .into_new_student()
        };

        assert_eq!(parse(json!("4")).unwrap().year, 4);
        assert!(parse(json!(0)).is_err());
        assert!(parse(json!(5)).is_err());
        assert!(parse(json!("second")).is_err());
    }

    #[test]
    fn test_student_request_bad_email() {
        let errors = serde_json::from_value::<CreateStudentRequest>(json!({
            "name": "Asha", "email": "asha-at-university", "year": 2
        }))
        .unwrap()
        .into_new_student()
        .unwrap_err();
        assert_eq!(
            errors.to_message_map()["email"],
            vec!["must be a valid email address"]
        );
    }

    #[test]
    fn test_participation_ids() {
        let req: ParticipationRequest =
            serde_json::from_value(json!({ "student_id": "3", "event_id": 2 })).unwrap();
        assert_eq!(req.ids().unwrap(), (3, 2));

        let req: ParticipationRequest = serde_json::from_value(json!({ "student_id": 0 })).unwrap();
        let errors = req.ids().unwrap_err();
        let messages = errors.to_message_map();
        assert_eq!(messages["student_id"], vec!["must be at least 1 (got 0)"]);
        assert_eq!(messages["event_id"], vec!["field is required"]);
    }

    #[test]
    fn test_feedback_request_score_range() {
        let req: FeedbackRequest = serde_json::from_value(json!({
            "student_id": 1, "event_id": 1, "score": 6
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let messages = errors.to_message_map();
        assert_eq!(messages.keys().collect::<Vec<_>>(), vec!["score"]);
        assert_eq!(messages["score"], vec!["must be between 1 and 5 (got 6)"]);
    }
}
