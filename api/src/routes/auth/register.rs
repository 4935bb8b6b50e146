use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, RegisterRequest};
use crate::handlers::{handle_domain_error, validation_error};

use gk_core::repositories::{TokenRepository, UserRepository};
use gk_core::services::auth::CredentialHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Ann",
///     "email": "ann@x.com",
///     "password": "at least 8 characters"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "expires_in": 900,
///     "user": { "id": 1, "name": "Ann", "email": "ann@x.com" }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid body
/// - 409 Conflict: Email already registered
/// - 500 Internal Server Error: Store or signing failure
pub async fn register<U, T, H>(
    state: web::Data<AppState<U, T, H>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(response) => HttpResponse::Created().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
