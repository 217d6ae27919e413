use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application error taxonomy. Every store-facing call is wrapped so that no
/// raw rusqlite/r2d2 error reaches a client; each variant maps to a stable
/// status code and user-facing message.
#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Hash(String),
    Session(String),
    Unauthorized,
    MissingScope,
    InvalidIdentifier(String),
    Validation(String),
    Duplicate(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Unauthorized => write!(f, "Authentication required"),
            AppError::MissingScope => {
                write!(f, "Date or date-range parameters are required")
            }
            AppError::InvalidIdentifier(id) => write!(f, "Invalid identifier: {id}"),
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::Duplicate(msg) => write!(f, "{msg}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

fn json_message(msg: &str) -> serde_json::Value {
    serde_json::json!({ "message": msg })
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(json_message("Authentication required"))
            }
            AppError::MissingScope => HttpResponse::BadRequest()
                .json(json_message("Date or date-range parameters are required")),
            AppError::InvalidIdentifier(_) => {
                HttpResponse::BadRequest().json(json_message("Invalid identifier"))
            }
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json_message(msg)),
            AppError::Duplicate(msg) => HttpResponse::Conflict().json(json_message(msg)),
            AppError::NotFound => HttpResponse::NotFound().json(json_message("Not found")),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(json_message("Internal server error"))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}
