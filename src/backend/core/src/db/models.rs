//! Record types held by the store.
//!
//! Timestamps are naive date-times; they serialize as `YYYY-MM-DDTHH:MM:SS`,
//! the same shape the seed data and the inbound API use.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type EventId = u64;
pub type StudentId = u64;
pub type RegistrationId = u64;
pub type AttendanceId = u64;
pub type FeedbackId = u64;

/// A campus event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub capacity: u32,
}

/// A student who may register for events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    /// Year of study, 1 through 4.
    pub year: u8,
}

/// Links one student to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub event_id: EventId,
    pub registration_date: NaiveDateTime,
}

/// Confirms that a registered student attended. At most one per registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub registration_id: RegistrationId,
    pub attended_at: NaiveDateTime,
}

/// Post-event score and comments. At most one per registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub registration_id: RegistrationId,
    pub score: u8,
    pub comments: String,
    pub submitted_at: NaiveDateTime,
}

/// Validated input for [`crate::db::Database::create_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub capacity: u32,
}

/// Validated input for [`crate::db::Database::create_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub year: u8,
}

/// A registration joined with the registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRegistration {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub event_id: EventId,
    pub registration_date: NaiveDateTime,
    pub student_name: String,
    pub student_email: String,
}

/// Number of records in each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub events: usize,
    pub students: usize,
    pub registrations: usize,
    pub attendance: usize,
    pub feedback: usize,
}
