use actix_session::Session;

use crate::errors::AppError;

pub fn get_operator_id(session: &Session) -> Option<i64> {
    session.get::<i64>("operator_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    session.get::<String>("username").unwrap_or(None)
}

/// Store the signed-in operator in the session cookie.
pub fn sign_in(session: &Session, operator_id: i64, username: &str) -> Result<(), AppError> {
    session
        .insert("operator_id", operator_id)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert("username", username)
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(())
}

pub fn sign_out(session: &Session) {
    session.purge();
}
