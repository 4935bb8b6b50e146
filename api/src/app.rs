//! Application factory
//!
//! Builds the Actix-web application from already constructed services. The
//! binary and the integration tests share this wiring.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::json_error_handler;
use crate::middleware::auth::{JwtAuth, SessionData};
use crate::routes::auth::{
    login::login, logout::logout, refresh::refresh, register::register, AppState,
};

use gk_core::repositories::{TokenRepository, UserRepository};
use gk_core::services::auth::CredentialHasher;
use gk_infra::DatabasePool;

/// Create and configure the application with all dependencies
pub fn create_app<U, T, H>(
    app_state: web::Data<AppState<U, T, H>>,
    session: SessionData,
    pool: web::Data<DatabasePool>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    H: CredentialHasher + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(session)
        .app_data(pool)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(register::<U, T, H>))
                    .route("/login", web::post().to(login::<U, T, H>))
                    .route("/refresh", web::post().to(refresh::<U, T, H>))
                    .route(
                        "/logout",
                        web::post().to(logout::<U, T, H>).wrap(JwtAuth::new()),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
///
/// Reports 503 when the credential store does not answer.
async fn health_check(pool: web::Data<DatabasePool>) -> HttpResponse {
    match pool.health_check().await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "service": "gatekeep",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
        _ => HttpResponse::ServiceUnavailable().json(gk_shared::ErrorResponse::new(
            gk_shared::error_codes::DATABASE_ERROR,
            "Credential store is unavailable",
        )),
    }
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(gk_shared::ErrorResponse::new(
        gk_shared::error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
