//! Mapping of domain failures to HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use gk_core::errors::{DomainError, ErrorKind};
use gk_shared::{error_codes, ErrorResponse};
use std::collections::HashMap;
use validator::ValidationErrors;

/// HTTP status for each error classification
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidCredentials
        | ErrorKind::InvalidToken
        | ErrorKind::Expired
        | ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::StoreFailure | ErrorKind::Signing | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert a domain error into its JSON response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(error.kind());
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::debug!(error = %error, "Request rejected");
    }

    HttpResponse::build(status).json(error.to_error_response())
}

/// 400 response listing the failing fields
pub fn validation_error(errors: &ValidationErrors) -> HttpResponse {
    let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
    for (field, errors) in errors.field_errors() {
        let messages = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        field_errors.insert(field.to_string(), messages);
    }

    let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body")
        .add_detail("fields", field_errors);
    HttpResponse::BadRequest().json(response)
}

/// Malformed JSON bodies get the same shape as validation failures
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string());
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(response))
        .into()
}

/// Domain error usable as an actix error, e.g. from middleware
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.kind())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.0.to_error_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gk_core::errors::{AuthError, TokenError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::from(AuthError::Conflict), StatusCode::CONFLICT),
            (
                DomainError::from(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (DomainError::from(AuthError::Expired), StatusCode::UNAUTHORIZED),
            (
                DomainError::from(TokenError::TokenExpired),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Validation {
                    message: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::store("Failed to find user", "disk I/O error"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_domain_error(error).status(), expected);
        }
    }

    #[test]
    fn test_api_error_status() {
        let error = ApiError::from(DomainError::from(AuthError::Unauthenticated));
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(error.to_string(), "Authentication required");
    }
}
