//! Domain-specific error types for authentication and token operations
//!
//! Messages here are what callers see. `AuthError::InvalidCredentials` in
//! particular must never carry detail about which half of a login failed.

use gk_shared::{error_codes, ErrorResponse};
use thiserror::Error;

/// Authentication lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already registered")]
    Conflict,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidToken,

    #[error("Refresh token expired")]
    Expired,

    #[error("Authentication required")]
    Unauthenticated,
}

/// Token signing and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret not configured: {kind}")]
    MissingSecret { kind: &'static str },

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token claims")]
    InvalidClaims,
}

/// Convert AuthError to ErrorResponse
impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let error_code = match err {
            AuthError::Conflict => error_codes::CONFLICT,
            AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AuthError::InvalidToken => error_codes::TOKEN_INVALID,
            AuthError::Expired => error_codes::TOKEN_EXPIRED,
            AuthError::Unauthenticated => error_codes::UNAUTHORIZED,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

/// Convert TokenError to ErrorResponse
impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        let error_code = match err {
            TokenError::MissingSecret { .. } | TokenError::TokenGenerationFailed => {
                error_codes::TOKEN_GENERATION_FAILED
            }
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidTokenFormat
            | TokenError::InvalidSignature
            | TokenError::InvalidAlgorithm
            | TokenError::TokenNotYetValid
            | TokenError::InvalidClaims => error_codes::TOKEN_INVALID,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}
