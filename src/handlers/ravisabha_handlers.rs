use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance::scope;
use crate::models::ravisabha::{self, RavisabhaInput};

/// List interval parameters: explicit range, calendar month (`YYYY-MM`),
/// calendar year (`YYYY`), or the current month when none is given.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub month: Option<String>,
    pub year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListQuery {
    fn interval(&self) -> Result<(chrono::NaiveDate, chrono::NaiveDate), AppError> {
        if let (Some(s), Some(e)) = (self.start_date.as_deref(), self.end_date.as_deref()) {
            return Ok((scope::parse_date(s)?, scope::parse_date(e)?));
        }
        if let Some(m) = self.month.as_deref() {
            return scope::month_interval(m);
        }
        if let Some(y) = self.year.as_deref() {
            return scope::year_interval(y);
        }
        Ok(scope::current_month_interval(
            chrono::Local::now().date_naive(),
        ))
    }
}

/// GET /api/ravisabha — sessions in the interval, newest first, each with
/// its attendance count.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let (start, end) = query.interval()?;
    let conn = pool.get()?;
    let sessions = ravisabha::find_in_range(&conn, start, end)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ravisabhas": sessions })))
}

/// POST /api/ravisabha — one session per calendar date; a taken date is 409.
pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<RavisabhaInput>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let id = ravisabha::create(&conn, &body)?;
    let created = ravisabha::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/ravisabha/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let found = ravisabha::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// PUT /api/ravisabha/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<RavisabhaInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;
    ravisabha::update(&conn, id, &body)?;
    let updated = ravisabha::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/ravisabha/{id}
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    if !ravisabha::delete(&conn, path.into_inner())? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Ravisabha deleted successfully" })))
}
