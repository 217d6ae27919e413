use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{password, session};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::operator;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "message": "Invalid username or password"
    }))
}

/// POST /api/login
pub async fn login(
    pool: web::Data<DbPool>,
    http_session: Session,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    let found = operator::find_by_username(&conn, &body.username)?;
    let Some(op) = found else {
        return Ok(invalid_credentials());
    };

    match password::verify_password(&body.password, &op.password_hash) {
        Ok(true) => {
            session::sign_in(&http_session, op.id, &op.username)?;
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Login successful",
                "user": { "id": op.id, "username": op.username }
            })))
        }
        _ => Ok(invalid_credentials()),
    }
}

/// POST /api/logout
pub async fn logout(http_session: Session) -> Result<HttpResponse, AppError> {
    session::sign_out(&http_session);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out" })))
}
