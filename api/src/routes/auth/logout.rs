use actix_web::{web, HttpResponse};

use crate::dto::auth_dto::LogoutResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthenticatedUser;

use gk_core::repositories::{TokenRepository, UserRepository};
use gk_core::services::auth::CredentialHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes every refresh token of the caller. Requires a bearer access token.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "logged out successfully"
/// }
/// ```
pub async fn logout<U, T, H>(
    state: web::Data<AppState<U, T, H>>,
    auth: AuthenticatedUser,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    H: CredentialHasher + 'static,
{
    match state.auth_service.logout(auth.0.id).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
