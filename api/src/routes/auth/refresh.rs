use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, RefreshTokenRequest};
use crate::handlers::{handle_domain_error, validation_error};

use gk_core::repositories::{TokenRepository, UserRepository};
use gk_core::services::auth::CredentialHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is consumed.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing refresh token
/// - 401 Unauthorized: Invalid, already used or expired refresh token
/// - 500 Internal Server Error: Store or signing failure
pub async fn refresh<U, T, H>(
    state: web::Data<AppState<U, T, H>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    H: CredentialHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(response) => HttpResponse::Ok().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
