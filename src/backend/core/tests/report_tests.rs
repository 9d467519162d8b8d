//! Store and report behaviour exercised through the public library API.
//!
//! Tests cover:
//! - Id assignment and listing order
//! - Each aggregate report on hand-built stores
//! - Report idempotence
//! - Seeding

use campus_core::db::models::{EventId, NewEvent, NewStudent, StudentId};
use campus_core::db::seed::{sample_store, seed_once};
use campus_core::db::{Database, RecordStore};
use campus_core::reports;
use chrono::{NaiveDate, NaiveDateTime};

// ============================================================================
// Fixtures
// ============================================================================

fn on(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn add_event(store: &mut RecordStore, name: &str, date: NaiveDateTime) -> EventId {
    store.insert_event(NewEvent {
        name: name.to_string(),
        description: format!("{name} description"),
        date,
        location: "Main Hall".to_string(),
        capacity: 100,
    })
}

fn add_student(store: &mut RecordStore, name: &str) -> StudentId {
    let email = format!("{}@campus.edu", name.to_lowercase().replace(' ', "."));
    store
        .insert_student(NewStudent {
            name: name.to_string(),
            email,
            year: 2,
        })
        .unwrap()
}

fn students(store: &mut RecordStore, count: usize) -> Vec<StudentId> {
    (0..count)
        .map(|i| add_student(store, &format!("Student {i}")))
        .collect()
}

// ============================================================================
// Ids and Listing
// ============================================================================

#[test]
fn test_created_event_appears_once_in_list() {
    let db = Database::new();
    let id = db.create_event(NewEvent {
        name: "Robotics Demo".to_string(),
        description: "Line followers".to_string(),
        date: on(5, 2),
        location: "Lab 3".to_string(),
        capacity: 40,
    });

    let matching: Vec<_> = db
        .list_events()
        .into_iter()
        .filter(|e| e.name == "Robotics Demo")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, id);
    assert_eq!(matching[0].capacity, 40);
}

#[test]
fn test_ids_strictly_increase_across_creations() {
    let mut store = RecordStore::new();
    let ids: Vec<EventId> = (1..=10).map(|d| add_event(&mut store, "E", on(1, d))).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    // Failed inserts do not consume ids.
    let first = add_student(&mut store, "Dup");
    assert!(store
        .insert_student(NewStudent {
            name: "Dup Again".to_string(),
            email: "dup@campus.edu".to_string(),
            year: 1,
        })
        .is_err());
    let next = add_student(&mut store, "Other");
    assert_eq!(next, first + 1);
}

#[test]
fn test_ids_continue_after_seed_data() {
    let mut store = sample_store().unwrap();
    let max_event = store.events().iter().map(|e| e.id).max().unwrap();
    let max_student = store.students().iter().map(|s| s.id).max().unwrap();

    assert!(add_event(&mut store, "New", on(6, 1)) > max_event);
    assert!(add_student(&mut store, "Newcomer") > max_student);
}

#[test]
fn test_listing_order_across_shuffled_insertions() {
    let mut store = RecordStore::new();
    for (day, name) in [(17, "Quiz"), (3, "Hackathon"), (28, "Gala"), (3, "Drive"), (11, "Talk")] {
        add_event(&mut store, name, on(2, day));
    }
    for name in ["Zoe", "amir", "Bela", "Carl", "Aaron"] {
        add_student(&mut store, name);
    }

    let events = store.list_events();
    assert!(events.windows(2).all(|w| w[0].date >= w[1].date));
    // Equal dates keep insertion order.
    let same_day: Vec<&str> = events
        .iter()
        .filter(|e| e.date == on(2, 3))
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(same_day, vec!["Hackathon", "Drive"]);

    let names: Vec<String> = store.list_students().into_iter().map(|s| s.name).collect();
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(names, vec!["Aaron", "Bela", "Carl", "Zoe", "amir"]);
}

// ============================================================================
// Event Popularity
// ============================================================================

#[test]
fn test_event_popularity_sorted_and_complete() {
    let mut store = RecordStore::new();
    let empty = add_event(&mut store, "Empty", on(3, 1));
    let pair = add_event(&mut store, "Pair", on(3, 2));
    let full = add_event(&mut store, "Full", on(3, 3));
    let people = students(&mut store, 5);

    for s in &people[..2] {
        store.register(*s, pair, on(2, 1)).unwrap();
    }
    for s in &people {
        store.register(*s, full, on(2, 1)).unwrap();
    }

    let rows = reports::event_popularity(&store);
    let counts: Vec<usize> = rows.iter().map(|r| r.total_registrations).collect();
    let names: Vec<&str> = rows.iter().map(|r| r.event_name.as_str()).collect();
    assert_eq!(counts, vec![5, 2, 0]);
    assert_eq!(names, vec!["Full", "Pair", "Empty"]);
    assert!(store.event(empty).is_some());
}

// ============================================================================
// Attendance
// ============================================================================

#[test]
fn test_attendance_half_present_and_unregistered_zero() {
    let mut store = RecordStore::new();
    let busy = add_event(&mut store, "Busy", on(3, 1));
    add_event(&mut store, "Quiet", on(3, 2));
    let people = students(&mut store, 4);

    for s in &people {
        store.register(*s, busy, on(2, 1)).unwrap();
    }
    for s in &people[..2] {
        store.mark_attendance(*s, busy, on(3, 1)).unwrap();
    }

    let rows = reports::attendance_rates(&store);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].event_name, "Busy");
    assert_eq!(rows[0].attendance_percentage, 50.0);
    assert_eq!(rows[1].event_name, "Quiet");
    assert_eq!(rows[1].attendance_percentage, 0.0);
}

#[test]
fn test_attendance_percentage_rounded() {
    let mut store = RecordStore::new();
    let event = add_event(&mut store, "Thirds", on(3, 1));
    let people = students(&mut store, 3);
    for s in &people {
        store.register(*s, event, on(2, 1)).unwrap();
    }
    store.mark_attendance(people[0], event, on(3, 1)).unwrap();
    store.mark_attendance(people[1], event, on(3, 1)).unwrap();

    assert_eq!(reports::attendance_rates(&store)[0].attendance_percentage, 66.67);
}

// ============================================================================
// Feedback
// ============================================================================

#[test]
fn test_feedback_average_and_absent_events() {
    let mut store = RecordStore::new();
    let rated = add_event(&mut store, "Rated", on(3, 1));
    let silent = add_event(&mut store, "Silent", on(3, 2));
    let people = students(&mut store, 3);

    for (s, score) in people.iter().zip([5u8, 4, 5]) {
        store.register(*s, rated, on(2, 1)).unwrap();
        store.mark_attendance(*s, rated, on(3, 1)).unwrap();
        store
            .submit_feedback(*s, rated, score, String::new(), on(3, 1))
            .unwrap();
    }
    store.register(people[0], silent, on(2, 2)).unwrap();

    let rows = reports::feedback_averages(&store);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_name, "Rated");
    assert_eq!(rows[0].average_feedback, 4.67);
}

// ============================================================================
// Top Students
// ============================================================================

#[test]
fn test_top_students_excludes_zero_and_ranks() {
    let mut store = RecordStore::new();
    let events: Vec<EventId> = (1..=3).map(|d| add_event(&mut store, "E", on(4, d))).collect();
    let names = ["Asha", "Ben", "Chen", "Dev", "Eli"];
    let people: Vec<StudentId> = names.iter().map(|n| add_student(&mut store, n)).collect();

    for (student, attended) in people.iter().zip([3usize, 0, 1, 2, 0]) {
        for event in &events[..attended] {
            store.register(*student, *event, on(3, 1)).unwrap();
            store.mark_attendance(*student, *event, on(4, 1)).unwrap();
        }
    }
    // Registered but absent does not count.
    store.register(people[1], events[0], on(3, 1)).unwrap();

    let rows = reports::top_students(&store);
    let ranked: Vec<(&str, usize)> = rows
        .iter()
        .map(|r| (r.student_name.as_str(), r.events_attended))
        .collect();
    assert_eq!(ranked, vec![("Asha", 3), ("Dev", 2), ("Chen", 1)]);
}

// ============================================================================
// Student Participation
// ============================================================================

#[test]
fn test_student_participation_lists_attended_events_newest_first() {
    let store = sample_store().unwrap();
    let report = reports::student_participation(&store, 1).unwrap();

    assert_eq!(report.student.name, "Arjun Sharma");
    assert_eq!(report.events_attended, 2);
    let names: Vec<&str> = report.events.iter().map(|e| e.event_name.as_str()).collect();
    assert_eq!(names, vec!["Campus Placement Drive", "Tech Symposium 2024"]);
    assert_eq!(report.events[1].feedback_score, Some(5));
}

#[test]
fn test_student_participation_unknown_student() {
    let store = sample_store().unwrap();
    assert!(reports::student_participation(&store, 999).is_err());
}

// ============================================================================
// Idempotence and Seeding
// ============================================================================

#[test]
fn test_reports_are_idempotent() {
    let db = Database::new();
    db.seed().unwrap();

    assert_eq!(db.event_popularity(), db.event_popularity());
    assert_eq!(db.attendance_rates(), db.attendance_rates());
    assert_eq!(db.feedback_averages(), db.feedback_averages());
    assert_eq!(db.top_students(), db.top_students());
    assert_eq!(db.student_participation(3).unwrap(), db.student_participation(3).unwrap());
}

#[test]
fn test_seed_twice_matches_seed_once() {
    let once = Database::new();
    assert!(once.seed().unwrap());

    let twice = Database::new();
    assert!(twice.seed().unwrap());
    assert!(!twice.seed().unwrap());

    assert_eq!(once.counts(), twice.counts());
    assert_eq!(once.list_events(), twice.list_events());
    assert_eq!(once.list_students(), twice.list_students());
    assert_eq!(once.top_students(), twice.top_students());
}

#[test]
fn test_seed_keeps_records_created_after_it() {
    let mut store = RecordStore::new();
    assert!(seed_once(&mut store).unwrap());
    let id = add_event(&mut store, "Late Addition", on(9, 1));
    assert!(!seed_once(&mut store).unwrap());
    assert!(store.event(id).is_some());
}

#[test]
fn test_seeded_reports() {
    let store = sample_store().unwrap();

    let popularity: Vec<usize> = reports::event_popularity(&store)
        .iter()
        .map(|r| r.total_registrations)
        .collect();
    assert_eq!(popularity, vec![4, 3, 2, 1]);

    let attendance: Vec<f64> = reports::attendance_rates(&store)
        .iter()
        .map(|r| r.attendance_percentage)
        .collect();
    assert_eq!(attendance, vec![100.0, 75.0, 66.67, 50.0]);

    let feedback: Vec<(String, f64)> = reports::feedback_averages(&store)
        .into_iter()
        .map(|r| (r.event_name, r.average_feedback))
        .collect();
    assert_eq!(
        feedback,
        vec![
            ("Tech Symposium 2024".to_string(), 5.0),
            ("Entrepreneurship Summit".to_string(), 5.0),
            ("Cultural Fest - Rangmanch".to_string(), 4.0),
            ("Campus Placement Drive".to_string(), 3.5),
        ]
    );

    let top: Vec<String> = reports::top_students(&store)
        .into_iter()
        .map(|r| r.student_name)
        .collect();
    assert_eq!(top, vec!["Arjun Sharma", "Rahul Gupta", "Priya Patel"]);
}
