//! Attendance store tests — insert, duplicate enforcement, scope queries,
//! projection of stored rows, status toggling, deletion, and the gender
//! aggregate.

mod common;

use common::*;
use haajri::errors::AppError;
use haajri::models::attendance::projection::epoch_millis;
use haajri::models::attendance::scope::Scope;
use haajri::models::attendance::{self, NewAttendance, Status};
use haajri::models::ravisabha::{self, RavisabhaInput};

fn day(date: &str) -> Scope {
    Scope::resolve(None, None, None, Some(date)).expect("valid day scope")
}

#[test]
fn insert_and_project_single_record() {
    let (_dir, conn) = setup_test_db();
    let member_id = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");

    let id = mark_attendance(&conn, member_id, None, Status::Present, "2024-03-01", "09:00");
    assert!(id > 0);

    let records = attendance::find_by_scope(&conn, &day("2024-03-01")).expect("query");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.status, Status::Present);
    assert_eq!(record.status.label(), "Present");
    assert_eq!(record.date, "2024-03-01");
    assert_eq!(record.time, "09:00");
    assert_eq!(record.timestamp, epoch_millis("2024-03-01", "09:00").unwrap());
    assert_eq!(record.member.first_name, "Asha");
    assert_eq!(record.member.smk_no, "SMK-001");
}

#[test]
fn duplicate_same_member_same_day_is_conflict() {
    let (_dir, conn) = setup_test_db();
    let member_id = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");

    mark_attendance(&conn, member_id, None, Status::Present, "2024-03-01", "09:00");

    // Second insert for the same member and calendar day, later wall-clock.
    let second = attendance::insert(
        &conn,
        &NewAttendance {
            member_id,
            ravisabha_id: None,
            status: Status::Present,
            recorded_at: Some("2024-03-01T18:30:00".to_string()),
        },
    );
    assert!(matches!(second, Err(AppError::Duplicate(_))));

    // Exactly one record persists.
    let records = attendance::find_by_scope(&conn, &day("2024-03-01")).expect("query");
    assert_eq!(records.len(), 1);
}

#[test]
fn same_member_different_days_is_allowed() {
    let (_dir, conn) = setup_test_db();
    let member_id = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");

    mark_attendance(&conn, member_id, None, Status::Present, "2024-03-01", "09:00");
    mark_attendance(&conn, member_id, None, Status::Absent, "2024-03-08", "09:00");

    let scope = Scope::resolve(None, Some("2024-03-01"), Some("2024-03-31"), None).unwrap();
    let records = attendance::find_by_scope(&conn, &scope).expect("query");
    assert_eq!(records.len(), 2);
}

#[test]
fn unknown_member_reference_is_rejected() {
    let (_dir, conn) = setup_test_db();
    let result = attendance::insert(
        &conn,
        &NewAttendance {
            member_id: 9999,
            ravisabha_id: None,
            status: Status::Present,
            recorded_at: Some("2024-03-01T09:00:00".to_string()),
        },
    );
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn day_scope_includes_the_whole_day() {
    let (_dir, conn) = setup_test_db();
    let early = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");
    let late = seed_member(&conn, "Bhavin", "Patel", "SMK-002", "1", "9876543211");
    let outside = seed_member(&conn, "Chirag", "Desai", "SMK-003", "1", "9876543212");

    mark_attendance(&conn, early, None, Status::Present, "2024-03-01", "00:00");
    mark_attendance(&conn, late, None, Status::Present, "2024-03-01", "23:59");
    mark_attendance(&conn, outside, None, Status::Present, "2024-03-02", "00:00");

    let records = attendance::find_by_scope(&conn, &day("2024-03-01")).expect("query");
    assert_eq!(records.len(), 2);
}

#[test]
fn range_scope_is_inclusive_and_newest_first() {
    let (_dir, conn) = setup_test_db();
    for (i, date) in ["2024-02-29", "2024-03-01", "2024-03-15", "2024-03-31", "2024-04-01"]
        .iter()
        .enumerate()
    {
        let member = seed_member(
            &conn,
            &format!("Member{i}"),
            "Test",
            &format!("SMK-{i:03}"),
            "1",
            &format!("98000000{i:02}"),
        );
        mark_attendance(&conn, member, None, Status::Present, date, "10:00");
    }

    let scope = Scope::resolve(None, Some("2024-03-01"), Some("2024-03-31"), None).unwrap();
    let records = attendance::find_by_scope(&conn, &scope).expect("query");
    let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-31", "2024-03-15", "2024-03-01"]);
}

#[test]
fn session_scope_bypasses_date_filtering() {
    let (_dir, conn) = setup_test_db();
    let sabha_id = ravisabha::create(
        &conn,
        &RavisabhaInput {
            date: Some("2024-03-03".to_string()),
            ..RavisabhaInput::default()
        },
    )
    .expect("create ravisabha");

    let in_session = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");
    let unscoped = seed_member(&conn, "Bhavin", "Patel", "SMK-002", "1", "9876543211");

    mark_attendance(&conn, in_session, Some(sabha_id), Status::Present, "2024-03-03", "09:00");
    mark_attendance(&conn, unscoped, None, Status::Present, "2024-03-03", "09:30");

    let records = attendance::find_by_scope(&conn, &Scope::Ravisabha(sabha_id)).expect("query");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].member.first_name, "Asha");
    assert_eq!(records[0].ravisabha_id, Some(sabha_id));
}

#[test]
fn status_toggle_is_persisted_in_place() {
    let (_dir, conn) = setup_test_db();
    let member_id = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");
    let id = mark_attendance(&conn, member_id, None, Status::Present, "2024-03-01", "09:00");

    let before = attendance::find_view_by_id(&conn, id).expect("query").expect("record");
    assert_eq!(before.status, Status::Present);

    assert!(attendance::set_status(&conn, id, before.status.toggled()).expect("update"));

    let after = attendance::find_view_by_id(&conn, id).expect("query").expect("record");
    assert_eq!(after.status, Status::Absent);
    // Everything except status is unchanged.
    assert_eq!(after.date, before.date);
    assert_eq!(after.time, before.time);
    assert_eq!(after.timestamp, before.timestamp);
}

#[test]
fn set_status_on_vanished_id_reports_missing() {
    let (_dir, conn) = setup_test_db();
    assert!(!attendance::set_status(&conn, 9999, Status::Present).expect("update"));
}

#[test]
fn delete_by_id_removes_exactly_one_record() {
    let (_dir, conn) = setup_test_db();
    let a = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");
    let b = seed_member(&conn, "Bhavin", "Patel", "SMK-002", "1", "9876543211");
    let id_a = mark_attendance(&conn, a, None, Status::Present, "2024-03-01", "09:00");
    mark_attendance(&conn, b, None, Status::Present, "2024-03-01", "09:05");

    assert!(attendance::delete_by_id(&conn, id_a).expect("delete"));
    assert!(!attendance::delete_by_id(&conn, id_a).expect("redelete"));

    let records = attendance::find_by_scope(&conn, &day("2024-03-01")).expect("query");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].member.first_name, "Bhavin");
}

#[test]
fn empty_scope_yields_empty_set_not_error() {
    let (_dir, conn) = setup_test_db();
    let records = attendance::find_by_scope(&conn, &day("2030-01-01")).expect("query");
    assert!(records.is_empty());
}

#[test]
fn gender_counts_aggregate_by_scope() {
    let (_dir, conn) = setup_test_db();
    let genders = ["1", "1", "2", "x"];
    for (i, gender) in genders.iter().enumerate() {
        let member = seed_member(
            &conn,
            &format!("Member{i}"),
            "Test",
            &format!("SMK-{i:03}"),
            gender,
            &format!("98000000{i:02}"),
        );
        mark_attendance(&conn, member, None, Status::Present, "2024-03-01", "10:00");
    }

    let counts = attendance::gender_counts(&conn, &day("2024-03-01")).expect("aggregate");
    assert_eq!(counts.male, 2);
    assert_eq!(counts.female, 1);
    assert_eq!(counts.total, 4); // unknown encodings still count toward total
    assert!(counts.male + counts.female <= counts.total);

    let empty = attendance::gender_counts(&conn, &day("2030-01-01")).expect("aggregate");
    assert_eq!(empty.total, 0);
}

#[test]
fn count_by_member_tracks_references() {
    let (_dir, conn) = setup_test_db();
    let member_id = seed_member(&conn, "Asha", "Shah", "SMK-001", "2", "9876543210");
    assert_eq!(attendance::count_by_member(&conn, member_id).expect("count"), 0);

    mark_attendance(&conn, member_id, None, Status::Present, "2024-03-01", "09:00");
    mark_attendance(&conn, member_id, None, Status::Present, "2024-03-08", "09:00");
    assert_eq!(attendance::count_by_member(&conn, member_id).expect("count"), 2);
}
