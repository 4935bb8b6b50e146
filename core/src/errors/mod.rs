//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, TokenError};

use gk_shared::{error_codes, ErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Underlying persistence failure, carrying the operation context
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Coarse classification of every failure the lifecycle can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    InvalidCredentials,
    InvalidToken,
    Expired,
    Unauthenticated,
    StoreFailure,
    Signing,
    Validation,
    Internal,
}

impl DomainError {
    /// Wrap a store failure with the operation that produced it
    pub fn store(context: &str, err: impl std::fmt::Display) -> Self {
        DomainError::Store {
            message: format!("{}: {}", context, err),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::Store { .. } => ErrorKind::StoreFailure,
            DomainError::Internal { .. } => ErrorKind::Internal,
            DomainError::Auth(AuthError::Conflict) => ErrorKind::Conflict,
            DomainError::Auth(AuthError::InvalidCredentials) => ErrorKind::InvalidCredentials,
            DomainError::Auth(AuthError::InvalidToken) => ErrorKind::InvalidToken,
            DomainError::Auth(AuthError::Expired) => ErrorKind::Expired,
            DomainError::Auth(AuthError::Unauthenticated) => ErrorKind::Unauthenticated,
            DomainError::Token(TokenError::MissingSecret { .. })
            | DomainError::Token(TokenError::TokenGenerationFailed) => ErrorKind::Signing,
            DomainError::Token(_) => ErrorKind::InvalidToken,
        }
    }

    /// Build the client-facing response for this error
    ///
    /// Store and internal failures are reported with a generic message; their
    /// detail belongs in the logs, not in the response body.
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Auth(err) => ErrorResponse::from(err),
            DomainError::Token(err) => ErrorResponse::from(err),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::Store { .. } => {
                ErrorResponse::new(error_codes::DATABASE_ERROR, "A storage error occurred")
            }
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
