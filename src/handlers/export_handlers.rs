use actix_web::{HttpResponse, web};

use super::attendance_handlers::ReportQuery;
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance;
use crate::models::report::{csv, engine};

/// GET /api/attendance/export — CSV download of the full filtered, sorted
/// set (never paginated). The column variant comes from configuration.
pub async fn export(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let scope = query.scope()?;
    let state = query.view_state()?;

    let conn = pool.get()?;
    let records = attendance::find_by_scope(&conn, &scope)?;
    let rows = engine::filter_and_sort(&records, &state.filters, &state.sort);
    let body = csv::to_csv(&rows, config.export_variant);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"attendance_export.csv\"",
        ))
        .body(body))
}
