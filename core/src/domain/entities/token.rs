//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Email of the user at issuance
    pub email: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl AccessClaims {
    /// Creates claims for an access token issued at `now`
    pub fn new(user: &User, issuer: &str, lifetime: Duration, now: DateTime<Utc>) -> Self {
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.sub.parse()
    }
}

/// Claims carried by a refresh token
///
/// There is deliberately no subject: the owner is recovered from the store,
/// which keeps the token revocable by deleting its row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID, makes every refresh token string unique
    pub jti: String,
}

impl RefreshClaims {
    /// Creates claims for a refresh token issued at `now`
    pub fn new(issuer: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Refresh token record stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Store-assigned identifier, 0 until persisted
    pub id: i64,

    /// The signed refresh token string
    pub token: String,

    /// User ID this token belongs to
    pub user_id: i64,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a new, unsaved refresh token record
    pub fn new(token: String, user_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            token,
            user_id,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Checks whether the stored expiry lies before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// A refresh token joined with the user that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenWithUser {
    pub token: RefreshToken,
    pub user: User,
}

/// Token pair returned after issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,
}
