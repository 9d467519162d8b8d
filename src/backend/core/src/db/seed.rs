//! Fixed sample dataset loaded by `POST /init-db`.

use chrono::{NaiveDate, NaiveDateTime};

use super::models::{Attendance, Event, Feedback, Registration, Student};
use super::store::{NextIds, RecordStore};
use crate::error::{CampusError, Result};

/// Sample timestamps all fall in 2024, on the hour.
fn at(month: u32, day: u32, hour: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| {
            CampusError::configuration(format!(
                "invalid sample timestamp 2024-{month:02}-{day:02} {hour:02}:00"
            ))
        })
}

fn event(id: u64, name: &str, description: &str, date: NaiveDateTime, location: &str, capacity: u32) -> Event {
    Event {
        id,
        name: name.to_string(),
        description: description.to_string(),
        date,
        location: location.to_string(),
        capacity,
    }
}

fn student(id: u64, name: &str, email: &str, year: u8) -> Student {
    Student {
        id,
        name: name.to_string(),
        email: email.to_string(),
        year,
    }
}

fn registration(id: u64, student_id: u64, event_id: u64, registration_date: NaiveDateTime) -> Registration {
    Registration {
        id,
        student_id,
        event_id,
        registration_date,
    }
}

fn attendance(id: u64, registration_id: u64, attended_at: NaiveDateTime) -> Attendance {
    Attendance {
        id,
        registration_id,
        attended_at,
    }
}

fn feedback(id: u64, registration_id: u64, score: u8, comments: &str, submitted_at: NaiveDateTime) -> Feedback {
    Feedback {
        id,
        registration_id,
        score,
        comments: comments.to_string(),
        submitted_at,
    }
}

/// Build the sample store. Counters continue after the last seeded id.
///
/// # Errors
///
/// Returns a configuration error if a sample timestamp is not a real date.
pub fn sample_store() -> Result<RecordStore> {
    let events = vec![
        event(
            1,
            "Tech Symposium 2024",
            "Annual technology symposium featuring AI, blockchain, and emerging technologies",
            at(3, 15, 9)?,
            "Dr. A.P.J. Abdul Kalam Auditorium",
            300,
        ),
        event(
            2,
            "Campus Placement Drive",
            "Meet top recruiters from leading Indian and multinational companies",
            at(3, 20, 10)?,
            "Central Placement Cell",
            200,
        ),
        event(
            3,
            "Cultural Fest - Rangmanch",
            "Celebrate diversity with music, dance, and cultural performances",
            at(4, 1, 18)?,
            "University Amphitheatre",
            500,
        ),
        event(
            4,
            "Entrepreneurship Summit",
            "Learn from successful Indian entrepreneurs and startup founders",
            at(4, 10, 14)?,
            "Innovation Hub",
            150,
        ),
    ];

    let students = vec![
        student(1, "Arjun Sharma", "arjun.sharma@university.ac.in", 3),
        student(2, "Priya Patel", "priya.patel@university.ac.in", 2),
        student(3, "Rahul Gupta", "rahul.gupta@university.ac.in", 4),
        student(4, "Sneha Reddy", "sneha.reddy@university.ac.in", 1),
        student(5, "Vikram Singh", "vikram.singh@university.ac.in", 3),
        student(6, "Ananya Iyer", "ananya.iyer@university.ac.in", 2),
        student(7, "Karthik Nair", "karthik.nair@university.ac.in", 4),
        student(8, "Meera Joshi", "meera.joshi@university.ac.in", 1),
    ];

    let registrations = vec![
        registration(1, 1, 1, at(3, 1, 10)?),
        registration(2, 1, 2, at(3, 2, 10)?),
        registration(3, 2, 1, at(3, 3, 10)?),
        registration(4, 2, 3, at(3, 4, 10)?),
        registration(5, 3, 2, at(3, 5, 10)?),
        registration(6, 3, 3, at(3, 6, 10)?),
        registration(7, 4, 1, at(3, 7, 10)?),
        registration(8, 5, 4, at(3, 8, 10)?),
        registration(9, 6, 1, at(3, 9, 10)?),
        registration(10, 7, 2, at(3, 10, 10)?),
    ];

    let attendance = vec![
        attendance(1, 1, at(3, 15, 9)?),
        attendance(2, 2, at(3, 20, 10)?),
        attendance(3, 3, at(3, 15, 9)?),
        attendance(4, 5, at(3, 20, 10)?),
        attendance(5, 6, at(4, 1, 18)?),
        attendance(6, 8, at(4, 10, 14)?),
        attendance(7, 9, at(3, 15, 9)?),
    ];

    let feedback = vec![
        feedback(1, 1, 5, "Excellent symposium! Very informative sessions.", at(3, 15, 17)?),
        feedback(2, 2, 4, "Great placement opportunities and company interactions", at(3, 20, 17)?),
        feedback(3, 3, 5, "Outstanding technical content and speakers", at(3, 15, 17)?),
        feedback(4, 5, 3, "Good event but could improve organization", at(3, 20, 17)?),
        feedback(5, 6, 4, "Amazing cultural performances and diversity", at(4, 1, 22)?),
        feedback(6, 8, 5, "Inspiring entrepreneurs and valuable insights", at(4, 10, 18)?),
    ];

    Ok(RecordStore {
        events,
        students,
        registrations,
        attendance,
        feedback,
        next_ids: NextIds {
            events: 5,
            students: 9,
            registrations: 11,
            attendance: 8,
            feedback: 7,
        },
        seeded: true,
    })
}

/// Replace the store with the sample dataset unless it was already seeded.
///
/// Returns `true` when the dataset was loaded by this call. The store is
/// left untouched if the sample data cannot be built.
pub fn seed_once(store: &mut RecordStore) -> Result<bool> {
    if store.seeded {
        return Ok(false);
    }
    *store = sample_store()?;
    Ok(true)
}
