use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Directory entry for a person who can be marked present/absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub smk_no: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub first_name_guj: String,
    pub middle_name_guj: String,
    pub last_name_guj: String,
    pub gender: String,
    pub age: i64,
    pub mobile_no: String,
    pub village: String,
    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
}

/// Request body for member create/update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    #[serde(default)]
    pub smk_no: Option<String>,
    #[serde(default)]
    pub mobile_no: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub village: String,
}

const SELECT_MEMBER: &str = "\
    SELECT id, smk_no, first_name, middle_name, last_name, \
           first_name_guj, middle_name_guj, last_name_guj, \
           gender, age, mobile_no, village, created_at, updated_at \
    FROM members";

fn row_to_member(row: &rusqlite::Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get("id")?,
        smk_no: row.get("smk_no")?,
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        last_name: row.get("last_name")?,
        first_name_guj: row.get("first_name_guj")?,
        middle_name_guj: row.get("middle_name_guj")?,
        last_name_guj: row.get("last_name_guj")?,
        gender: row.get("gender")?,
        age: row.get("age")?,
        mobile_no: row.get("mobile_no")?,
        village: row.get("village")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Member>> {
    let sql = format!("{SELECT_MEMBER} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_member)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn find_by_smk_no(conn: &Connection, smk_no: &str) -> rusqlite::Result<Option<Member>> {
    let sql = format!("{SELECT_MEMBER} WHERE smk_no = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![smk_no], row_to_member)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Case-insensitive substring search across name fields, SMK number, and
/// mobile number. Capped at 10 results.
pub fn search(conn: &Connection, query: &str) -> rusqlite::Result<Vec<Member>> {
    let pattern = format!("%{}%", query.trim());
    let sql = format!(
        "{SELECT_MEMBER} \
         WHERE first_name LIKE ?1 OR middle_name LIKE ?1 OR last_name LIKE ?1 \
            OR smk_no LIKE ?1 OR mobile_no LIKE ?1 \
         ORDER BY first_name, last_name \
         LIMIT 10"
    );
    let mut stmt = conn.prepare(&sql)?;
    let members = stmt
        .query_map(params![pattern], row_to_member)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(members)
}

/// Create a member. An empty SMK number is auto-generated for walk-ins; a
/// taken SMK number is a 409-class conflict.
pub fn create(conn: &Connection, input: &MemberInput) -> Result<i64, AppError> {
    let smk_no = match input.smk_no.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => generate_smk_no(
            &input.first_name,
            &input.middle_name,
            &input.last_name,
            chrono::Local::now().date_naive(),
        ),
    };

    if find_by_smk_no(conn, &smk_no)?.is_some() {
        return Err(AppError::Duplicate(
            "Member with this SMK number already exists".to_string(),
        ));
    }

    conn.execute(
        "INSERT INTO members (smk_no, first_name, middle_name, last_name, \
                              gender, age, mobile_no, village) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            smk_no,
            input.first_name,
            input.middle_name,
            input.last_name,
            input.gender,
            input.age,
            input.mobile_no,
            input.village,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a member. Changing the SMK number to one held by another member is
/// a 409-class conflict.
pub fn update(conn: &Connection, id: i64, input: &MemberInput) -> Result<(), AppError> {
    let existing = find_by_id(conn, id)?.ok_or(AppError::NotFound)?;

    let smk_no = match input.smk_no.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => existing.smk_no.clone(),
    };
    if smk_no != existing.smk_no {
        if let Some(other) = find_by_smk_no(conn, &smk_no)? {
            if other.id != id {
                return Err(AppError::Duplicate(
                    "Member with this SMK number already exists".to_string(),
                ));
            }
        }
    }

    conn.execute(
        "UPDATE members SET smk_no = ?1, first_name = ?2, middle_name = ?3, \
                last_name = ?4, gender = ?5, age = ?6, mobile_no = ?7, village = ?8, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now','localtime') \
         WHERE id = ?9",
        params![
            smk_no,
            input.first_name,
            input.middle_name,
            input.last_name,
            input.gender,
            input.age,
            input.mobile_no,
            input.village,
            id,
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM members WHERE id = ?1", params![id])?;
    Ok(())
}

/// Generated registration number for walk-ins without one:
/// `Non_<initials>_<DDMMYYYY>`, e.g. `Non_PJP_15112025`.
pub fn generate_smk_no(first: &str, middle: &str, last: &str, on: NaiveDate) -> String {
    let mut initials = String::new();
    for name in [first, middle, last] {
        if let Some(c) = name.chars().next() {
            initials.extend(c.to_uppercase());
        }
    }
    format!(
        "Non_{}_{:02}{:02}{}",
        initials,
        on.day(),
        on.month(),
        on.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smk_no_uses_initials_and_date() {
        let on = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        assert_eq!(
            generate_smk_no("Pulkit", "Jadishbhai", "Patel", on),
            "Non_PJP_15112025"
        );
    }

    #[test]
    fn smk_no_skips_empty_middle_name() {
        let on = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(generate_smk_no("Asha", "", "Shah", on), "Non_AS_02012025");
    }
}
