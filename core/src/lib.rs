//! # Gatekeep Core
//!
//! Domain layer of the token lifecycle service: entities, the token codec,
//! the lifecycle manager, the session guard, the expired-token reclaimer,
//! repository traits and error types. Storage and password hashing are
//! supplied by the infrastructure crate through traits.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{NewUser, RefreshToken, RefreshTokenWithUser, TokenPair, User};
pub use domain::value_objects::AuthResponse;
pub use errors::{AuthError, DomainError, DomainResult, ErrorKind, TokenError};
pub use repositories::{TokenRepository, UserRepository};
pub use services::{
    extract_bearer_token, AuthService, CredentialHasher, SessionGuard, TokenCleanupConfig,
    TokenCleanupService, TokenService, TokenServiceConfig,
};
