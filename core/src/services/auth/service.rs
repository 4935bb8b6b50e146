//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{NewUser, User};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use super::hasher::CredentialHasher;

/// Authentication service managing the access/refresh token lifecycle
///
/// Every user holds at most one refresh token. Register and login replace it,
/// refresh rotates it, logout deletes it.
pub struct AuthService<U, T, H>
where
    U: UserRepository,
    T: TokenRepository,
    H: CredentialHasher + 'static,
{
    /// User repository for account lookups
    user_repository: Arc<U>,
    /// Token repository for refresh token persistence
    token_repository: Arc<T>,
    /// Token service for signing and verification
    token_service: Arc<TokenService>,
    /// Password hasher
    hasher: Arc<H>,
}

impl<U, T, H> AuthService<U, T, H>
where
    U: UserRepository,
    T: TokenRepository,
    H: CredentialHasher + 'static,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_repository` - Repository for refresh token persistence
    /// * `token_service` - Service for JWT signing and verification
    /// * `hasher` - Password hasher
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        token_service: Arc<TokenService>,
        hasher: Arc<H>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            token_service,
            hasher,
        }
    }

    /// Register a new account and open its first session
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - A fresh token pair and the created user
    /// * `Err(AuthError::Conflict)` - The email is already registered
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthResponse> {
        if self.user_repository.find_by_email(email).await?.is_some() {
            warn!("Registration rejected: email already registered");
            return Err(AuthError::Conflict.into());
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .user_repository
            .create(NewUser::new(name, email, password_hash))
            .await?;

        let response = self.open_session(user).await?;
        info!(user_id = response.user.id, "User registered");
        Ok(response)
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.verify_password(password, &user.password_hash).await? {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let response = self.open_session(user).await?;
        info!(user_id = response.user.id, "User logged in");
        Ok(response)
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The presented token is consumed: a second use fails with
    /// `AuthError::InvalidToken`, even when both uses race.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        if let Err(e) = self.token_service.verify_refresh(refresh_token) {
            warn!(error = %e, "Refresh rejected: token failed verification");
            return Err(AuthError::InvalidToken.into());
        }

        let stored = match self.token_repository.find_refresh_token(refresh_token).await? {
            Some(stored) => stored,
            None => {
                warn!("Refresh rejected: token not on record");
                return Err(AuthError::InvalidToken.into());
            }
        };

        if stored.token.is_expired_at(Utc::now()) {
            self.token_repository
                .delete_by_user_id(stored.user.id)
                .await?;
            warn!(user_id = stored.user.id, "Refresh rejected: token expired");
            return Err(AuthError::Expired.into());
        }

        let user = stored.user;
        let (pair, record) = self.token_service.issue_token_pair(&user)?;
        let rotated = self
            .token_repository
            .rotate_token(refresh_token, record)
            .await?;
        if rotated.is_none() {
            warn!(user_id = user.id, "Refresh rejected: token already rotated");
            return Err(AuthError::InvalidToken.into());
        }

        info!(user_id = user.id, "Refresh token rotated");
        Ok(self.respond(pair, user))
    }

    /// Revoke every refresh token of a user
    ///
    /// Idempotent: logging out without a live session succeeds.
    pub async fn logout(&self, user_id: i64) -> DomainResult<()> {
        let revoked = self.token_repository.delete_by_user_id(user_id).await?;
        info!(user_id, revoked, "User logged out");
        Ok(())
    }

    /// Issue a pair and make its refresh side the user's only one
    async fn open_session(&self, user: User) -> DomainResult<AuthResponse> {
        let (pair, record) = self.token_service.issue_token_pair(&user)?;
        self.token_repository
            .replace_user_token(user.id, record)
            .await?;
        Ok(self.respond(pair, user))
    }

    fn respond(&self, pair: TokenPair, user: User) -> AuthResponse {
        AuthResponse::from_token_pair(pair, user, self.token_service.access_expires_in())
    }

    async fn hash_password(&self, password: &str) -> DomainResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
    }

    /// An unreadable stored hash counts as a mismatch.
    async fn verify_password(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let hash = hash.to_owned();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?;

        match verified {
            Ok(matches) => Ok(matches),
            Err(e) => {
                error!(error = %e, "Stored password hash could not be verified");
                Ok(false)
            }
        }
    }
}
