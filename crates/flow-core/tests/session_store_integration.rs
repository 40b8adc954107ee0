//! Integration tests for session persistence on a database file.

mod common;

use chrono::Duration;
use flow_core::{Database, Durations, SessionStore};

#[test]
fn test_sample_week_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flow.db");
    let sessions = common::sample_week();

    {
        let mut store = SessionStore::new(Box::new(Database::open_at(&path).unwrap()));
        for session in &sessions {
            store.append(session.clone()).unwrap();
        }
    }

    let store = SessionStore::new(Box::new(Database::open_at(&path).unwrap()));
    assert_eq!(store.sessions(), sessions.as_slice());
    assert_eq!(store.load(), sessions);
}

#[test]
fn test_sub_second_dates_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flow.db");
    let session = common::session_at(Duration::milliseconds(86_400_123), 1500, "Design");

    {
        let mut store = SessionStore::new(Box::new(Database::open_at(&path).unwrap()));
        store.append(session.clone()).unwrap();
    }

    let store = SessionStore::new(Box::new(Database::open_at(&path).unwrap()));
    let loaded = &store.sessions()[0];
    assert_eq!(loaded.id, session.id);
    assert_eq!(loaded.date, session.date);
    assert_eq!(loaded.tag, "Design");
}

#[test]
fn test_durations_default_on_fresh_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(Box::new(
        Database::open_at(dir.path().join("flow.db")).unwrap(),
    ));
    assert_eq!(store.load_durations(Durations::default()), Durations::default());
}
