//! In-memory record store.
//!
//! Holds the five collections in insertion order together with their id
//! counters. Listing clones and sorts; the collections themselves are never
//! reordered, so insertion order stays available as the tie-breaker for
//! listings and reports.

use chrono::NaiveDateTime;

use super::models::{
    Attendance, AttendanceId, Event, EventId, EventRegistration, Feedback, FeedbackId, NewEvent,
    NewStudent, RecordCounts, Registration, RegistrationId, Student, StudentId,
};
use crate::error::{CampusError, Result};

/// Lowest and highest accepted feedback score.
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Next id to hand out for each collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NextIds {
    pub events: u64,
    pub students: u64,
    pub registrations: u64,
    pub attendance: u64,
    pub feedback: u64,
}

impl Default for NextIds {
    fn default() -> Self {
        Self {
            events: 1,
            students: 1,
            registrations: 1,
            attendance: 1,
            feedback: 1,
        }
    }
}

fn take_id(counter: &mut u64) -> u64 {
    let id = *counter;
    *counter += 1;
    id
}

/// The five entity collections plus id counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    pub(crate) events: Vec<Event>,
    pub(crate) students: Vec<Student>,
    pub(crate) registrations: Vec<Registration>,
    pub(crate) attendance: Vec<Attendance>,
    pub(crate) feedback: Vec<Feedback>,
    pub(crate) next_ids: NextIds,
    pub(crate) seeded: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw collections, in insertion order
    // ─────────────────────────────────────────────────────────────────────────

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn attendance(&self) -> &[Attendance] {
        &self.attendance
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    /// Whether the sample dataset has been loaded.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            events: self.events.len(),
            students: self.students.len(),
            registrations: self.registrations.len(),
            attendance: self.attendance.len(),
            feedback: self.feedback.len(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listing and lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// All events, most recent date first. Equal dates keep insertion order.
    pub fn list_events(&self) -> Vec<Event> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| b.date.cmp(&a.date));
        events
    }

    /// All students by name, byte-wise ascending. Equal names keep insertion order.
    pub fn list_students(&self) -> Vec<Student> {
        let mut students = self.students.clone();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        students
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn registration_for(&self, student_id: StudentId, event_id: EventId) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|r| r.student_id == student_id && r.event_id == event_id)
    }

    pub fn attendance_for(&self, registration_id: RegistrationId) -> Option<&Attendance> {
        self.attendance
            .iter()
            .find(|a| a.registration_id == registration_id)
    }

    pub fn feedback_for(&self, registration_id: RegistrationId) -> Option<&Feedback> {
        self.feedback
            .iter()
            .find(|f| f.registration_id == registration_id)
    }

    /// Registrations for an event joined with their students, oldest first.
    pub fn event_registrations(&self, event_id: EventId) -> Result<Vec<EventRegistration>> {
        if self.event(event_id).is_none() {
            return Err(CampusError::not_found("Event", event_id.to_string()));
        }

        let mut rows: Vec<EventRegistration> = self
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .filter_map(|r| {
                // Registrations pointing at unknown students are skipped, like an inner join.
                self.student(r.student_id).map(|s| EventRegistration {
                    id: r.id,
                    student_id: r.student_id,
                    event_id: r.event_id,
                    registration_date: r.registration_date,
                    student_name: s.name.clone(),
                    student_email: s.email.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.registration_date.cmp(&b.registration_date));
        Ok(rows)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn insert_event(&mut self, new: NewEvent) -> EventId {
        let id = take_id(&mut self.next_ids.events);
        self.events.push(Event {
            id,
            name: new.name,
            description: new.description,
            date: new.date,
            location: new.location,
            capacity: new.capacity,
        });
        id
    }

    /// Insert a student. Email addresses must be unique.
    pub fn insert_student(&mut self, new: NewStudent) -> Result<StudentId> {
        if self.students.iter().any(|s| s.email == new.email) {
            return Err(CampusError::duplicate("Email already exists")
                .with_context("email", &new.email));
        }

        let id = take_id(&mut self.next_ids.students);
        self.students.push(Student {
            id,
            name: new.name,
            email: new.email,
            year: new.year,
        });
        Ok(id)
    }

    /// Register a student for an event. Both must exist and the pair must be new.
    pub fn register(
        &mut self,
        student_id: StudentId,
        event_id: EventId,
        at: NaiveDateTime,
    ) -> Result<RegistrationId> {
        if self.student(student_id).is_none() {
            return Err(CampusError::not_found("Student", student_id.to_string()));
        }
        if self.event(event_id).is_none() {
            return Err(CampusError::not_found("Event", event_id.to_string()));
        }
        if self.registration_for(student_id, event_id).is_some() {
            return Err(CampusError::duplicate("Student already registered for this event")
                .with_context("student_id", student_id)
                .with_context("event_id", event_id));
        }

        let id = take_id(&mut self.next_ids.registrations);
        self.registrations.push(Registration {
            id,
            student_id,
            event_id,
            registration_date: at,
        });
        Ok(id)
    }

    /// Record that a registered student attended an event.
    pub fn mark_attendance(
        &mut self,
        student_id: StudentId,
        event_id: EventId,
        at: NaiveDateTime,
    ) -> Result<AttendanceId> {
        let registration_id = self
            .registration_for(student_id, event_id)
            .map(|r| r.id)
            .ok_or_else(|| {
                CampusError::validation("Student must be registered for the event first")
                    .with_context("student_id", student_id)
                    .with_context("event_id", event_id)
            })?;

        if self.attendance_for(registration_id).is_some() {
            return Err(CampusError::duplicate("Attendance already recorded for this registration")
                .with_context("registration_id", registration_id));
        }

        let id = take_id(&mut self.next_ids.attendance);
        self.attendance.push(Attendance {
            id,
            registration_id,
            attended_at: at,
        });
        Ok(id)
    }

    /// Store feedback from a student who attended the event.
    pub fn submit_feedback(
        &mut self,
        student_id: StudentId,
        event_id: EventId,
        score: u8,
        comments: String,
        at: NaiveDateTime,
    ) -> Result<FeedbackId> {
        if !SCORE_RANGE.contains(&score) {
            return Err(CampusError::validation("Score must be between 1 and 5")
                .with_context("score", score));
        }

        let registration_id = self
            .registration_for(student_id, event_id)
            .map(|r| r.id)
            .filter(|id| self.attendance_for(*id).is_some())
            .ok_or_else(|| {
                CampusError::validation("Feedback allowed only for attended events")
                    .with_context("student_id", student_id)
                    .with_context("event_id", event_id)
            })?;

        if self.feedback_for(registration_id).is_some() {
            return Err(CampusError::duplicate("Feedback already submitted for this registration")
                .with_context("registration_id", registration_id));
        }

        let id = take_id(&mut self.next_ids.feedback);
        self.feedback.push(Feedback {
            id,
            registration_id,
            score,
            comments,
            submitted_at: at,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn new_event(name: &str, date: NaiveDateTime) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            description: format!("{name} description"),
            date,
            location: "Main Hall".to_string(),
            capacity: 100,
        }
    }

    fn new_student(name: &str) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            email: format!("{}@university.ac.in", name.to_lowercase()),
            year: 2,
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut store = RecordStore::new();
        let a = store.insert_event(new_event("A", at(1, 9)));
        let b = store.insert_event(new_event("B", at(2, 9)));
        let c = store.insert_event(new_event("C", at(3, 9)));
        assert_eq!((a, b, c), (1, 2, 3));

        let s1 = store.insert_student(new_student("Asha")).unwrap();
        let s2 = store.insert_student(new_student("Bala")).unwrap();
        assert_eq!((s1, s2), (1, 2));
    }

    #[test]
    fn test_list_events_most_recent_first_stable() {
        let mut store = RecordStore::new();
        store.insert_event(new_event("early", at(1, 9)));
        store.insert_event(new_event("late", at(20, 9)));
        store.insert_event(new_event("tie-first", at(10, 9)));
        store.insert_event(new_event("tie-second", at(10, 9)));

        let names: Vec<_> = store.list_events().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["late", "tie-first", "tie-second", "early"]);

        // Listing does not reorder the underlying collection.
        assert_eq!(store.events()[0].name, "early");
    }

    #[test]
    fn test_list_students_by_name_case_sensitive() {
        let mut store = RecordStore::new();
        store.insert_student(new_student("meera")).unwrap();
        store.insert_student(new_student("Arjun")).unwrap();
        store.insert_student(new_student("Zoya")).unwrap();

        let names: Vec<_> = store.list_students().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Arjun", "Zoya", "meera"]);
    }

    #[test]
    fn test_duplicate_email_rejected_without_mutation() {
        let mut store = RecordStore::new();
        store.insert_student(new_student("Asha")).unwrap();
        let before = store.clone();

        let err = store.insert_student(new_student("Asha")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
        assert_eq!(store, before);
    }

    #[test]
    fn test_register_requires_existing_records() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(1, 9)));

        let err = store.register(42, event, at(1, 8)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);

        let student = store.insert_student(new_student("Asha")).unwrap();
        let err = store.register(student, 99, at(1, 8)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);

        assert!(store.registrations().is_empty());
    }

    #[test]
    fn test_register_twice_is_duplicate() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(1, 9)));
        let student = store.insert_student(new_student("Asha")).unwrap();

        assert_eq!(store.register(student, event, at(1, 8)).unwrap(), 1);
        let err = store.register(student, event, at(1, 8)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
        assert_eq!(store.registrations().len(), 1);
    }

    #[test]
    fn test_attendance_requires_registration_and_is_unique() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(1, 9)));
        let student = store.insert_student(new_student("Asha")).unwrap();

        let err = store.mark_attendance(student, event, at(1, 9)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        store.register(student, event, at(1, 8)).unwrap();
        assert_eq!(store.mark_attendance(student, event, at(1, 9)).unwrap(), 1);

        let err = store.mark_attendance(student, event, at(1, 10)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
    }

    #[test]
    fn test_feedback_requires_attendance() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(1, 9)));
        let student = store.insert_student(new_student("Asha")).unwrap();
        store.register(student, event, at(1, 8)).unwrap();

        let err = store
            .submit_feedback(student, event, 4, String::new(), at(1, 17))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        store.mark_attendance(student, event, at(1, 9)).unwrap();
        let id = store
            .submit_feedback(student, event, 4, "Good".to_string(), at(1, 17))
            .unwrap();
        assert_eq!(id, 1);

        let err = store
            .submit_feedback(student, event, 5, String::new(), at(1, 18))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
    }

    #[test]
    fn test_feedback_score_out_of_range() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(1, 9)));
        let student = store.insert_student(new_student("Asha")).unwrap();
        store.register(student, event, at(1, 8)).unwrap();
        store.mark_attendance(student, event, at(1, 9)).unwrap();

        for score in [0, 6] {
            let err = store
                .submit_feedback(student, event, score, String::new(), at(1, 17))
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
        }
        assert!(store.feedback().is_empty());
    }

    #[test]
    fn test_event_registrations_joined_and_ordered() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(20, 9)));
        let late = store.insert_student(new_student("Late")).unwrap();
        let early = store.insert_student(new_student("Early")).unwrap();
        store.register(late, event, at(5, 10)).unwrap();
        store.register(early, event, at(2, 10)).unwrap();

        let rows = store.event_registrations(event).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["Early", "Late"]);
        assert_eq!(rows[0].student_email, "early@university.ac.in");

        let err = store.event_registrations(77).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }

    #[test]
    fn test_counts() {
        let mut store = RecordStore::new();
        let event = store.insert_event(new_event("A", at(1, 9)));
        let student = store.insert_student(new_student("Asha")).unwrap();
        store.register(student, event, at(1, 8)).unwrap();

        let counts = store.counts();
        assert_eq!(counts.events, 1);
        assert_eq!(counts.students, 1);
        assert_eq!(counts.registrations, 1);
        assert_eq!(counts.attendance, 0);
        assert_eq!(counts.feedback, 0);
    }
}
