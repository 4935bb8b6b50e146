use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest};
use crate::handlers::{handle_domain_error, validation_error};

use gk_core::repositories::{TokenRepository, UserRepository};
use gk_core::services::auth::CredentialHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// ## Errors
/// - 400 Bad Request: Invalid body
/// - 401 Unauthorized: Unknown email or wrong password (same message for both)
pub async fn login<U, T, H>(
    state: web::Data<AppState<U, T, H>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    H: CredentialHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
