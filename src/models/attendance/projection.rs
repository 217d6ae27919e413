//! Pure mapping from a stored attendance row to the normalized view record.
//!
//! The stored instant is round-tripped through its date and time strings
//! before the sort timestamp is computed. That discards sub-minute precision,
//! and in exchange the three derived fields are always mutually consistent:
//! `timestamp == epoch(date, time)` holds for every projected record.

use chrono::NaiveDateTime;

use super::types::{AttendanceRecord, Status, StoredAttendance};

/// Epoch milliseconds for a `YYYY-MM-DD` date plus `HH:MM` time. The single
/// date-time-to-epoch conversion in the codebase; no call site hand-rolls it.
pub fn epoch_millis(date: &str, time: &str) -> Option<i64> {
    let dt = NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").ok()?;
    Some(dt.and_utc().timestamp_millis())
}

/// Project a stored row into the view shape. Returns None for rows whose
/// stored instant is malformed; callers drop those rather than rendering
/// half-empty records.
pub fn project(stored: StoredAttendance) -> Option<AttendanceRecord> {
    // recorded_at is local wall-clock text '%Y-%m-%dT%H:%M:%S'
    let date = stored.recorded_at.get(..10)?.to_string();
    let time = stored.recorded_at.get(11..16)?.to_string();
    let timestamp = match epoch_millis(&date, &time) {
        Some(ts) => ts,
        None => {
            debug_assert!(false, "malformed recorded_at {:?}", stored.recorded_at);
            return None;
        }
    };

    Some(AttendanceRecord {
        id: stored.id,
        member: stored.member,
        status: Status::from_stored(&stored.status),
        date,
        time,
        timestamp,
        ravisabha_id: stored.ravisabha_id,
    })
}
