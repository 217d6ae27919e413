pub mod attendance_handlers;
pub mod auth_handlers;
pub mod export_handlers;
pub mod member_handlers;
pub mod ravisabha_handlers;

use actix_web::{
    Error, HttpResponse, web,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// CSRF protection for the JSON API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't carry
/// `Content-Type: application/json`. Browsers cannot send cross-origin JSON
/// with cookies via a simple form POST, so the Content-Type check acts as a
/// CSRF guard without requiring tokens. GET requests are exempt.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "message": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure all API routes. Everything except /api/login requires an
/// authenticated session.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/login", web::post().to(auth_handlers::login))
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(require_json_content_type))
                    .wrap(actix_web::middleware::from_fn(
                        crate::auth::middleware::require_auth,
                    ))
                    .route("/logout", web::post().to(auth_handlers::logout))
                    // Attendance — specific paths before /{id}
                    .route("/attendance", web::get().to(attendance_handlers::list))
                    .route("/attendance", web::post().to(attendance_handlers::create))
                    .route("/attendance/stats", web::get().to(attendance_handlers::stats))
                    .route("/attendance/report", web::get().to(attendance_handlers::report))
                    .route("/attendance/export", web::get().to(export_handlers::export))
                    .route(
                        "/attendance/{id}/status",
                        web::post().to(attendance_handlers::set_status),
                    )
                    .route("/attendance/{id}", web::delete().to(attendance_handlers::delete))
                    // Ravisabha sessions
                    .route("/ravisabha", web::get().to(ravisabha_handlers::list))
                    .route("/ravisabha", web::post().to(ravisabha_handlers::create))
                    .route("/ravisabha/{id}", web::get().to(ravisabha_handlers::read))
                    .route("/ravisabha/{id}", web::put().to(ravisabha_handlers::update))
                    .route("/ravisabha/{id}", web::delete().to(ravisabha_handlers::delete))
                    // Member directory — /members/search before /members/{id}
                    .route("/members/search", web::get().to(member_handlers::search))
                    .route("/members", web::post().to(member_handlers::create))
                    .route("/members/{id}", web::get().to(member_handlers::read))
                    .route("/members/{id}", web::put().to(member_handlers::update))
                    .route("/members/{id}", web::delete().to(member_handlers::delete)),
            ),
    );
}
