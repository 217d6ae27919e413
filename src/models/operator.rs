use rusqlite::{Connection, params};

/// Sign-in account for the attendance desk. Password hash is Argon2 PHC text.
#[derive(Debug, Clone)]
pub struct Operator {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<Operator>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash FROM operators WHERE username = ?1",
    )?;
    let mut rows = stmt.query_map(params![username], |row| {
        Ok(Operator {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
        })
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}
