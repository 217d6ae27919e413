use chrono::NaiveDate;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A single dated gathering that attendance records can be scoped to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ravisabha {
    pub id: i64,
    pub date: String,
    pub prasad: Option<String>,
    pub expense: Option<f64>,
    pub yajman: Option<String>,
    pub notes: Option<String>,
    pub attendance_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for ravisabha create/update. All fields optional on update;
/// `date` is required on create.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RavisabhaInput {
    pub date: Option<String>,
    pub prasad: Option<String>,
    pub expense: Option<f64>,
    pub yajman: Option<String>,
    pub notes: Option<String>,
}

const SELECT_RAVISABHA: &str = "\
    SELECT r.id, r.date, r.prasad, r.expense, r.yajman, r.notes, \
           r.created_at, r.updated_at, \
           COUNT(a.id) AS attendance_count \
    FROM ravisabhas r \
    LEFT JOIN attendance a ON a.ravisabha_id = r.id";

fn row_to_ravisabha(row: &rusqlite::Row) -> rusqlite::Result<Ravisabha> {
    Ok(Ravisabha {
        id: row.get("id")?,
        date: row.get("date")?,
        prasad: row.get("prasad")?,
        expense: row.get("expense")?,
        yajman: row.get("yajman")?,
        notes: row.get("notes")?,
        attendance_count: row.get("attendance_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn validate_date(date: &str) -> Result<String, AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| AppError::Validation(format!("Invalid date: {date}")))
}

fn map_unique_violation(e: rusqlite::Error) -> AppError {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return AppError::Duplicate("Ravisabha already exists for this date".to_string());
        }
    }
    AppError::Db(e)
}

/// Sessions within an inclusive date interval, newest first, each with its
/// attendance count.
pub fn find_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<Vec<Ravisabha>> {
    let sql = format!(
        "{SELECT_RAVISABHA} WHERE r.date >= ?1 AND r.date <= ?2 \
         GROUP BY r.id ORDER BY r.date DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ],
            row_to_ravisabha,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Ravisabha>> {
    let sql = format!("{SELECT_RAVISABHA} WHERE r.id = ?1 GROUP BY r.id");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_ravisabha)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Create a session. Only one may exist per calendar date.
pub fn create(conn: &Connection, input: &RavisabhaInput) -> Result<i64, AppError> {
    let date = input
        .date
        .as_deref()
        .ok_or_else(|| AppError::Validation("Date is required".to_string()))?;
    let date = validate_date(date)?;

    conn.execute(
        "INSERT INTO ravisabhas (date, prasad, expense, yajman, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![date, input.prasad, input.expense, input.yajman, input.notes],
    )
    .map_err(map_unique_violation)?;
    Ok(conn.last_insert_rowid())
}

/// Update a session in place; fields left out of the input are unchanged.
pub fn update(conn: &Connection, id: i64, input: &RavisabhaInput) -> Result<(), AppError> {
    let existing = find_by_id(conn, id)?.ok_or(AppError::NotFound)?;

    let date = match input.date.as_deref() {
        Some(d) => validate_date(d)?,
        None => existing.date,
    };
    let prasad = input.prasad.clone().or(existing.prasad);
    let expense = input.expense.or(existing.expense);
    let yajman = input.yajman.clone().or(existing.yajman);
    let notes = input.notes.clone().or(existing.notes);

    conn.execute(
        "UPDATE ravisabhas SET date = ?1, prasad = ?2, expense = ?3, yajman = ?4, \
                notes = ?5, updated_at = strftime('%Y-%m-%dT%H:%M:%S','now','localtime') \
         WHERE id = ?6",
        params![date, prasad, expense, yajman, notes, id],
    )
    .map_err(map_unique_violation)?;
    Ok(())
}

/// Delete a session. Returns false when the id no longer exists.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let affected = conn.execute("DELETE FROM ravisabhas WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}
