use rusqlite::{Connection, params};
use serde::Serialize;

use super::projection;
use super::scope::Scope;
use super::types::{AttendanceRecord, MemberSnapshot, NewAttendance, Status, StoredAttendance};
use crate::errors::AppError;
use crate::models::report::Gender;

/// Attendance row joined with its member. The inner join drops records whose
/// member reference no longer resolves.
const SELECT_ATTENDANCE: &str = "\
    SELECT a.id, a.ravisabha_id, a.status, a.recorded_at, \
           m.id AS member_id, m.smk_no, m.first_name, m.middle_name, m.last_name, \
           m.first_name_guj, m.middle_name_guj, m.last_name_guj, m.gender, m.mobile_no \
    FROM attendance a \
    JOIN members m ON m.id = a.member_id";

fn row_to_stored(row: &rusqlite::Row) -> rusqlite::Result<StoredAttendance> {
    Ok(StoredAttendance {
        id: row.get("id")?,
        ravisabha_id: row.get("ravisabha_id")?,
        status: row.get("status")?,
        recorded_at: row.get("recorded_at")?,
        member: MemberSnapshot {
            id: row.get("member_id")?,
            first_name: row.get("first_name")?,
            middle_name: row.get("middle_name")?,
            last_name: row.get("last_name")?,
            first_name_guj: row.get("first_name_guj")?,
            middle_name_guj: row.get("middle_name_guj")?,
            last_name_guj: row.get("last_name_guj")?,
            smk_no: row.get("smk_no")?,
            mobile_no: row.get("mobile_no")?,
            gender: row.get("gender")?,
        },
    })
}

/// Fetch and project every record in scope, newest first (the store's
/// default order; the report engine may re-sort).
pub fn find_by_scope(conn: &Connection, scope: &Scope) -> rusqlite::Result<Vec<AttendanceRecord>> {
    let stored: Vec<StoredAttendance> = match scope {
        Scope::Ravisabha(id) => {
            let sql =
                format!("{SELECT_ATTENDANCE} WHERE a.ravisabha_id = ?1 ORDER BY a.recorded_at DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![id], row_to_stored)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        _ => {
            // recorded_at_bounds is Some for every date-based scope
            let (start, end) = match scope.recorded_at_bounds() {
                Some(bounds) => bounds,
                None => return Ok(vec![]),
            };
            let sql = format!(
                "{SELECT_ATTENDANCE} WHERE a.recorded_at >= ?1 AND a.recorded_at <= ?2 \
                 ORDER BY a.recorded_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![start, end], row_to_stored)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };

    Ok(stored.into_iter().filter_map(projection::project).collect())
}

pub fn find_view_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<AttendanceRecord>> {
    let sql = format!("{SELECT_ATTENDANCE} WHERE a.id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_stored)?;
    match rows.next() {
        Some(row) => Ok(projection::project(row?)),
        None => Ok(None),
    }
}

/// Insert an attendance record. The store enforces one record per member per
/// calendar day; a second insert for the same day surfaces as Duplicate.
pub fn insert(conn: &Connection, new: &NewAttendance) -> Result<i64, AppError> {
    let recorded_at = new.recorded_at.clone().unwrap_or_else(|| {
        chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    });

    conn.execute(
        "INSERT INTO attendance (member_id, ravisabha_id, status, recorded_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            new.member_id,
            new.ravisabha_id,
            new.status.as_stored(),
            recorded_at
        ],
    )
    .map_err(map_insert_violation)?;
    Ok(conn.last_insert_rowid())
}

fn map_insert_violation(e: rusqlite::Error) -> AppError {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return AppError::Duplicate(
                "Attendance already marked for this member today".to_string(),
            );
        }
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
            return AppError::Validation("Unknown member or ravisabha reference".to_string());
        }
    }
    AppError::Db(e)
}

/// Set the status of a record in place. Returns false when the id vanished.
pub fn set_status(conn: &Connection, id: i64, status: Status) -> rusqlite::Result<bool> {
    let affected = conn.execute(
        "UPDATE attendance SET status = ?1 WHERE id = ?2",
        params![status.as_stored(), id],
    )?;
    Ok(affected > 0)
}

/// Delete a record by id. Returns false when the id vanished.
pub fn delete_by_id(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let affected = conn.execute("DELETE FROM attendance WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

/// Number of attendance rows referencing a member; used to block member
/// deletion while any exist.
pub fn count_by_member(conn: &Connection, member_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE member_id = ?1",
        params![member_id],
        |row| row.get(0),
    )
}

/// Store-level gender aggregate for a scope, decoupled from the engine's
/// client-derived counts so a summary can refresh independently.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: i64,
    pub female: i64,
    pub total: i64,
}

pub fn gender_counts(conn: &Connection, scope: &Scope) -> rusqlite::Result<GenderCounts> {
    let grouped: Vec<(String, i64)> = match scope {
        Scope::Ravisabha(id) => {
            let mut stmt = conn.prepare(
                "SELECT m.gender, COUNT(*) FROM attendance a \
                 JOIN members m ON m.id = a.member_id \
                 WHERE a.ravisabha_id = ?1 GROUP BY m.gender",
            )?;
            let rows = stmt
                .query_map(params![id], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        _ => {
            let (start, end) = match scope.recorded_at_bounds() {
                Some(bounds) => bounds,
                None => return Ok(GenderCounts::default()),
            };
            let mut stmt = conn.prepare(
                "SELECT m.gender, COUNT(*) FROM attendance a \
                 JOIN members m ON m.id = a.member_id \
                 WHERE a.recorded_at >= ?1 AND a.recorded_at <= ?2 GROUP BY m.gender",
            )?;
            let rows = stmt
                .query_map(params![start, end], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };

    let mut counts = GenderCounts::default();
    for (code, n) in grouped {
        counts.total += n;
        match Gender::decode(&code) {
            Gender::Male => counts.male += n,
            Gender::Female => counts.female += n,
            Gender::Unknown => {}
        }
    }
    Ok(counts)
}
