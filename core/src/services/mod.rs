//! Domain services for the token lifecycle

pub mod auth;
pub mod session;
pub mod token;

pub use auth::{AuthService, CredentialHasher};
pub use session::{extract_bearer_token, SessionGuard};
pub use token::{
    CleanupResult, TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
