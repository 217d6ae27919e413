use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance::{self, NewAttendance, Status, scope::Scope};
use crate::models::report::{
    RecordFilters, SortConfig, SortDir, SortKey, StatusFilter, ViewState, engine,
};

/// Scope parameters shared by the list and stats endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub ravisabha_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub date: Option<String>,
}

impl ScopeQuery {
    pub fn resolve(&self) -> Result<Scope, AppError> {
        Scope::resolve(
            self.ravisabha_id.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.date.as_deref(),
        )
    }
}

/// Scope plus engine view-state parameters, for the report and export
/// endpoints. `filterDate` is the per-column date predicate; `date` scopes
/// the fetch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub ravisabha_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub date: Option<String>,
    pub name: Option<String>,
    pub smk_no: Option<String>,
    pub mobile_no: Option<String>,
    pub filter_date: Option<String>,
    pub status: Option<String>,
    pub sort_key: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<usize>,
}

impl ReportQuery {
    pub fn scope(&self) -> Result<Scope, AppError> {
        Scope::resolve(
            self.ravisabha_id.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.date.as_deref(),
        )
    }

    pub fn view_state(&self) -> Result<ViewState, AppError> {
        let filters = RecordFilters {
            name: self.name.clone().unwrap_or_default(),
            smk_no: self.smk_no.clone().unwrap_or_default(),
            mobile_no: self.mobile_no.clone().unwrap_or_default(),
            date: self.filter_date.clone().unwrap_or_default(),
            status: StatusFilter::from_param(self.status.as_deref()),
        };

        let sort = match self.sort_key.as_deref() {
            Some(raw) => {
                let key = SortKey::from_param(raw)
                    .ok_or_else(|| AppError::Validation(format!("Invalid sort key: {raw}")))?;
                let dir = if self.sort_dir.as_deref() == Some("desc") {
                    SortDir::Desc
                } else {
                    SortDir::Asc
                };
                SortConfig { key, dir }
            }
            None => SortConfig::default(),
        };

        Ok(ViewState {
            filters,
            sort,
            page: self.page.unwrap_or(1).max(1),
        })
    }
}

/// GET /api/attendance — every record in scope, un-paginated, newest first.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<ScopeQuery>,
) -> Result<HttpResponse, AppError> {
    let scope = query.resolve()?;
    let conn = pool.get()?;
    let records = attendance::find_by_scope(&conn, &scope)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "records": records })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    pub member_id: i64,
    pub ravisabha_id: Option<i64>,
    pub status: Option<String>,
}

/// POST /api/attendance — mark a member. A second mark for the same member
/// on the same calendar day is a 409.
pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<CreateAttendance>,
) -> Result<HttpResponse, AppError> {
    let status = match body.status.as_deref() {
        Some(raw) => Status::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Invalid status: {raw}")))?,
        None => Status::Absent,
    };

    let conn = pool.get()?;
    let new = NewAttendance {
        member_id: body.member_id,
        ravisabha_id: body.ravisabha_id,
        status,
        recorded_at: None,
    };
    let id = attendance::insert(&conn, &new)?;

    let record = attendance::find_view_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(record))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: Option<String>,
}

/// POST /api/attendance/{id}/status — set the status, or toggle it when the
/// body names none. A single atomic store operation keyed by id.
pub async fn set_status(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<StatusBody>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;

    let current = attendance::find_view_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    let next = match body.status.as_deref() {
        Some(raw) => Status::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Invalid status: {raw}")))?,
        None => current.status.toggled(),
    };

    if !attendance::set_status(&conn, id, next)? {
        return Err(AppError::NotFound);
    }
    let record = attendance::find_view_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/attendance/{id}
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;
    if !attendance::delete_by_id(&conn, id)? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Record deleted successfully" })))
}

/// GET /api/attendance/stats — store-level gender aggregate for a scope,
/// independently refreshable from the report's derived counts.
pub async fn stats(
    pool: web::Data<DbPool>,
    query: web::Query<ScopeQuery>,
) -> Result<HttpResponse, AppError> {
    let scope = query.resolve()?;
    let conn = pool.get()?;
    let counts = attendance::gender_counts(&conn, &scope)?;
    Ok(HttpResponse::Ok().json(counts))
}

/// GET /api/attendance/report — the engine's view of the scope: visible
/// page, totals, and gender summary.
pub async fn report(
    pool: web::Data<DbPool>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let scope = query.scope()?;
    let state = query.view_state()?;
    let conn = pool.get()?;
    let records = attendance::find_by_scope(&conn, &scope)?;
    let page = engine::run(&records, &state);
    Ok(HttpResponse::Ok().json(page))
}
