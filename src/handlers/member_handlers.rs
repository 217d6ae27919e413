use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{attendance, member};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// GET /api/members/search?query= — substring search across names, SMK
/// number, and mobile number; empty query returns an empty list.
pub async fn search(
    pool: web::Data<DbPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.query.as_deref().unwrap_or("").trim().to_string();
    if q.is_empty() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "members": [] })));
    }

    let conn = pool.get()?;
    let members = member::search(&conn, &q)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "members": members })))
}

fn validate_names(input: &member::MemberInput) -> Result<(), AppError> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "First name and last name are required".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/members
pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<member::MemberInput>,
) -> Result<HttpResponse, AppError> {
    validate_names(&body)?;
    let conn = pool.get()?;
    let id = member::create(&conn, &body)?;
    let created = member::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/members/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let found = member::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// PUT /api/members/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<member::MemberInput>,
) -> Result<HttpResponse, AppError> {
    validate_names(&body)?;
    let id = path.into_inner();
    let conn = pool.get()?;
    member::update(&conn, id, &body)?;
    let updated = member::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/members/{id} — blocked while attendance rows reference the
/// member; those must be deleted first.
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;

    member::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;

    let referencing = attendance::count_by_member(&conn, id)?;
    if referencing > 0 {
        return Err(AppError::Duplicate(format!(
            "Cannot delete member with {referencing} attendance record(s)"
        )));
    }

    member::delete(&conn, id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Member deleted successfully" })))
}
