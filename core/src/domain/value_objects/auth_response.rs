//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;

/// Authentication response containing tokens and the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining a new pair
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// The authenticated user
    pub user: User,
}

impl AuthResponse {
    /// Creates an authentication response from a freshly issued token pair
    pub fn from_token_pair(pair: TokenPair, user: User, expires_in: i64) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in,
            user,
        }
    }
}
