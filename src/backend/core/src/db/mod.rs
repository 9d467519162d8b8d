//! Storage layer for the campus service.
//!
//! [`Database`] is a cheap-to-clone handle around a single in-memory
//! [`RecordStore`]. Every mutation runs under the write lock from validation
//! to append, so id counters and collections never interleave. Reports hold
//! the read lock for their whole computation and therefore always see one
//! consistent snapshot.

pub mod models;
pub mod seed;
pub mod store;

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;

use crate::error::{CampusError, Result};
use crate::reports::{
    self, AttendanceRate, EventPopularity, FeedbackAverage, StudentParticipation, TopStudent,
};
use crate::telemetry::metrics::BusinessMetrics;
use models::{
    AttendanceId, Event, EventId, EventRegistration, FeedbackId, NewEvent, NewStudent,
    RecordCounts, RegistrationId, Student, StudentId,
};
pub use store::RecordStore;

/// Shared handle to the record store.
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<RwLock<RecordStore>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("counts", &self.counts())
            .finish()
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Database {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing store.
    pub fn from_store(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run a read-only closure against a consistent snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> R {
        f(&self.inner.read())
    }

    /// Load the sample dataset the first time this is called.
    ///
    /// Returns `true` if this call loaded the data, `false` if the store was
    /// already seeded and nothing changed.
    pub fn seed(&self) -> Result<bool> {
        let seeded = seed::seed_once(&mut self.inner.write())?;
        BusinessMetrics::record_seed(seeded);
        if seeded {
            tracing::info!(counts = ?self.counts(), "Loaded sample dataset");
        } else {
            tracing::debug!("Sample dataset already loaded, skipping");
        }
        Ok(seeded)
    }

    pub fn counts(&self) -> RecordCounts {
        self.inner.read().counts()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn list_events(&self) -> Vec<Event> {
        self.inner.read().list_events()
    }

    pub fn get_event(&self, id: EventId) -> Result<Event> {
        self.inner
            .read()
            .event(id)
            .cloned()
            .ok_or_else(|| CampusError::not_found("Event", id.to_string()))
    }

    pub fn create_event(&self, new: NewEvent) -> EventId {
        let id = self.inner.write().insert_event(new);
        BusinessMetrics::record_created("event");
        tracing::info!(event_id = id, "Event created");
        id
    }

    pub fn event_registrations(&self, event_id: EventId) -> Result<Vec<EventRegistration>> {
        self.inner.read().event_registrations(event_id)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Students
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn list_students(&self) -> Vec<Student> {
        self.inner.read().list_students()
    }

    pub fn get_student(&self, id: StudentId) -> Result<Student> {
        self.inner
            .read()
            .student(id)
            .cloned()
            .ok_or_else(|| CampusError::not_found("Student", id.to_string()))
    }

    pub fn create_student(&self, new: NewStudent) -> Result<StudentId> {
        let id = self.inner.write().insert_student(new)?;
        BusinessMetrics::record_created("student");
        tracing::info!(student_id = id, "Student created");
        Ok(id)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Registrations, attendance, feedback
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn register(&self, student_id: StudentId, event_id: EventId) -> Result<RegistrationId> {
        let id = self.inner.write().register(student_id, event_id, now())?;
        BusinessMetrics::record_created("registration");
        tracing::info!(registration_id = id, student_id, event_id, "Student registered");
        Ok(id)
    }

    pub fn mark_attendance(&self, student_id: StudentId, event_id: EventId) -> Result<AttendanceId> {
        let id = self
            .inner
            .write()
            .mark_attendance(student_id, event_id, now())?;
        BusinessMetrics::record_created("attendance");
        tracing::info!(attendance_id = id, student_id, event_id, "Attendance marked");
        Ok(id)
    }

    pub fn submit_feedback(
        &self,
        student_id: StudentId,
        event_id: EventId,
        score: u8,
        comments: String,
    ) -> Result<FeedbackId> {
        let id = self
            .inner
            .write()
            .submit_feedback(student_id, event_id, score, comments, now())?;
        BusinessMetrics::record_created("feedback");
        tracing::info!(feedback_id = id, student_id, event_id, score, "Feedback submitted");
        Ok(id)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Reports
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn event_popularity(&self) -> Vec<EventPopularity> {
        BusinessMetrics::record_report("event_popularity");
        self.read(reports::event_popularity)
    }

    pub fn attendance_rates(&self) -> Vec<AttendanceRate> {
        BusinessMetrics::record_report("attendance");
        self.read(reports::attendance_rates)
    }

    pub fn feedback_averages(&self) -> Vec<FeedbackAverage> {
        BusinessMetrics::record_report("feedback");
        self.read(reports::feedback_averages)
    }

    pub fn top_students(&self) -> Vec<TopStudent> {
        BusinessMetrics::record_report("top_students");
        self.read(reports::top_students)
    }

    pub fn student_participation(&self, student_id: StudentId) -> Result<StudentParticipation> {
        BusinessMetrics::record_report("student_participation");
        self.read(|store| reports::student_participation(store, student_id))
    }
}
