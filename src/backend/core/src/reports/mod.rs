//! Aggregate reports over the record store.
//!
//! Every report is a pure function of a [`RecordStore`] snapshot and is
//! recomputed from scratch on each call. Rankings use stable sorts so rows
//! with equal values keep the insertion order of the underlying entity.
//!
//! Percentages and averages are rounded to two decimals, half away from zero.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::models::{EventId, RegistrationId, Student, StudentId};
use crate::db::store::RecordStore;
use crate::error::{CampusError, Result};

/// Number of rows returned by [`top_students`].
pub const TOP_STUDENTS_LIMIT: usize = 3;

// ═══════════════════════════════════════════════════════════════════════════════
// Report Rows
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPopularity {
    pub event_name: String,
    pub total_registrations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRate {
    pub event_name: String,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackAverage {
    pub event_name: String,
    pub average_feedback: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopStudent {
    pub student_name: String,
    pub events_attended: usize,
}

/// One attended event in a [`StudentParticipation`] report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipationEntry {
    pub event_id: EventId,
    pub event_name: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub attended_at: NaiveDateTime,
    pub feedback_score: Option<u8>,
    pub feedback_comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentParticipation {
    pub student: Student,
    pub events_attended: usize,
    pub events: Vec<ParticipationEntry>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Registration ids grouped by event, in registration insertion order.
fn registrations_by_event(store: &RecordStore) -> HashMap<EventId, Vec<RegistrationId>> {
    let mut map: HashMap<EventId, Vec<RegistrationId>> = HashMap::new();
    for r in store.registrations() {
        map.entry(r.event_id).or_default().push(r.id);
    }
    map
}

fn attended_registrations(store: &RecordStore) -> HashSet<RegistrationId> {
    store.attendance().iter().map(|a| a.registration_id).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reports
// ═══════════════════════════════════════════════════════════════════════════════

/// Registrations per event, most registered first. Includes events with none.
pub fn event_popularity(store: &RecordStore) -> Vec<EventPopularity> {
    let by_event = registrations_by_event(store);

    let mut rows: Vec<EventPopularity> = store
        .events()
        .iter()
        .map(|e| EventPopularity {
            event_name: e.name.clone(),
            total_registrations: by_event.get(&e.id).map_or(0, Vec::len),
        })
        .collect();
    rows.sort_by(|a, b| b.total_registrations.cmp(&a.total_registrations));
    rows
}

/// Share of registrations with an attendance record, per event.
///
/// Events without registrations report 0.
pub fn attendance_rates(store: &RecordStore) -> Vec<AttendanceRate> {
    let by_event = registrations_by_event(store);
    let attended = attended_registrations(store);

    let mut rows: Vec<AttendanceRate> = store
        .events()
        .iter()
        .map(|e| {
            let registrations = by_event.get(&e.id).map_or(&[][..], Vec::as_slice);
            let present = registrations.iter().filter(|id| attended.contains(*id)).count();
            let attendance_percentage = if registrations.is_empty() {
                0.0
            } else {
                round2(present as f64 * 100.0 / registrations.len() as f64)
            };
            AttendanceRate {
                event_name: e.name.clone(),
                attendance_percentage,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.attendance_percentage.total_cmp(&a.attendance_percentage));
    rows
}

/// Mean feedback score per event. Events without any feedback are left out.
pub fn feedback_averages(store: &RecordStore) -> Vec<FeedbackAverage> {
    let event_of: HashMap<RegistrationId, EventId> = store
        .registrations()
        .iter()
        .map(|r| (r.id, r.event_id))
        .collect();

    let mut scores: HashMap<EventId, (u64, usize)> = HashMap::new();
    for f in store.feedback() {
        if let Some(event_id) = event_of.get(&f.registration_id) {
            let entry = scores.entry(*event_id).or_default();
            entry.0 += u64::from(f.score);
            entry.1 += 1;
        }
    }

    let mut rows: Vec<FeedbackAverage> = store
        .events()
        .iter()
        .filter_map(|e| {
            let (sum, count) = scores.get(&e.id).copied()?;
            Some(FeedbackAverage {
                event_name: e.name.clone(),
                average_feedback: round2(sum as f64 / count as f64),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.average_feedback.total_cmp(&a.average_feedback));
    rows
}

/// The three students who attended the most events. Students who attended
/// nothing are never listed.
pub fn top_students(store: &RecordStore) -> Vec<TopStudent> {
    let attended = attended_registrations(store);

    let mut per_student: HashMap<StudentId, usize> = HashMap::new();
    for r in store.registrations() {
        if attended.contains(&r.id) {
            *per_student.entry(r.student_id).or_default() += 1;
        }
    }

    let mut rows: Vec<TopStudent> = store
        .students()
        .iter()
        .filter_map(|s| {
            let events_attended = per_student.get(&s.id).copied().unwrap_or(0);
            (events_attended > 0).then(|| TopStudent {
                student_name: s.name.clone(),
                events_attended,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.events_attended.cmp(&a.events_attended));
    rows.truncate(TOP_STUDENTS_LIMIT);
    rows
}

/// Events a student attended, most recent first, with any feedback they left.
pub fn student_participation(store: &RecordStore, student_id: StudentId) -> Result<StudentParticipation> {
    let student = store
        .student(student_id)
        .cloned()
        .ok_or_else(|| CampusError::not_found("Student", student_id.to_string()))?;

    let mut events: Vec<ParticipationEntry> = store
        .registrations()
        .iter()
        .filter(|r| r.student_id == student_id)
        .filter_map(|r| {
            let attendance = store.attendance_for(r.id)?;
            let event = store.event(r.event_id)?;
            let feedback = store.feedback_for(r.id);
            Some(ParticipationEntry {
                event_id: event.id,
                event_name: event.name.clone(),
                date: event.date,
                location: event.location.clone(),
                attended_at: attendance.attended_at,
                feedback_score: feedback.map(|f| f.score),
                feedback_comments: feedback.map(|f| f.comments.clone()),
            })
        })
        .collect();
    events.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(StudentParticipation {
        student,
        events_attended: events.len(),
        events,
    })
}
