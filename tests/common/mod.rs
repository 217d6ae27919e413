//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema applied. Seed helpers insert members and attendance rows at fixed
//! instants so ordering assertions stay deterministic.

use rusqlite::Connection;
use tempfile::TempDir;

use haajri::db::MIGRATIONS;
use haajri::models::attendance::{self, NewAttendance, Status};
use haajri::models::member::{self, MemberInput};

/// Setup a test database with schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Insert a member and return its id.
pub fn seed_member(
    conn: &Connection,
    first: &str,
    last: &str,
    smk_no: &str,
    gender: &str,
    mobile_no: &str,
) -> i64 {
    let input = MemberInput {
        first_name: first.to_string(),
        middle_name: String::new(),
        last_name: last.to_string(),
        smk_no: Some(smk_no.to_string()),
        mobile_no: mobile_no.to_string(),
        gender: gender.to_string(),
        age: 30,
        village: String::new(),
    };
    member::create(conn, &input).expect("Failed to seed member")
}

/// Insert an attendance row at a fixed local instant and return its id.
pub fn mark_attendance(
    conn: &Connection,
    member_id: i64,
    ravisabha_id: Option<i64>,
    status: Status,
    date: &str,
    time: &str,
) -> i64 {
    let new = NewAttendance {
        member_id,
        ravisabha_id,
        status,
        recorded_at: Some(format!("{date}T{time}:00")),
    };
    attendance::insert(conn, &new).expect("Failed to seed attendance")
}
