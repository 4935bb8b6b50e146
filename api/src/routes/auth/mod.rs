//! Authentication route handlers
//!
//! - Registration and login
//! - Token refresh
//! - Logout

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

use std::sync::Arc;

use gk_core::repositories::{TokenRepository, UserRepository};
use gk_core::services::auth::{AuthService, CredentialHasher};

/// Shared state for the authentication handlers
pub struct AppState<U, T, H>
where
    U: UserRepository,
    T: TokenRepository,
    H: CredentialHasher + 'static,
{
    pub auth_service: Arc<AuthService<U, T, H>>,
}

impl<U, T, H> AppState<U, T, H>
where
    U: UserRepository,
    T: TokenRepository,
    H: CredentialHasher + 'static,
{
    pub fn new(auth_service: Arc<AuthService<U, T, H>>) -> Self {
        Self { auth_service }
    }
}
