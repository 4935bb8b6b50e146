//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::{RefreshToken, RefreshTokenWithUser};
use crate::errors::DomainError;

/// Repository trait for RefreshToken persistence operations
///
/// A user owns at most one refresh token at a time. `replace_user_token` and
/// `rotate_token` are the writes that keep that true and each must run as a
/// single store transaction.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token without touching the user's other tokens
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved token with its store-assigned id
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token)
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its token string, joined with its owner
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenWithUser))` - Token found
    /// * `Ok(None)` - No such token (never issued, rotated away, or deleted)
    /// * `Err(DomainError)` - Database error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use gk_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.find_refresh_token("eyJhbGciOiJIUzI1NiJ9...").await? {
    ///     Some(found) => println!("Token belongs to {}", found.user.email),
    ///     None => println!("Token not found"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenWithUser>, DomainError>;

    /// Delete every refresh token owned by a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted, zero is not an error
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_by_user_id(&self, user_id: i64) -> Result<usize, DomainError>;

    /// Delete refresh tokens whose expiry is strictly before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired tokens deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Replace all of a user's refresh tokens with `token` in one transaction
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved replacement
    /// * `Err(DomainError)` - Nothing was changed
    async fn replace_user_token(
        &self,
        user_id: i64,
        token: RefreshToken,
    ) -> Result<RefreshToken, DomainError>;

    /// Rotate `previous` into `token` in one transaction
    ///
    /// The transaction deletes the `previous` row, then every other token of
    /// the same user, then inserts `token`. If `previous` is already gone the
    /// transaction is rolled back and `Ok(None)` is returned, so two
    /// concurrent rotations of the same token cannot both succeed.
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Rotation committed
    /// * `Ok(None)` - `previous` no longer exists
    /// * `Err(DomainError)` - Nothing was changed
    async fn rotate_token(
        &self,
        previous: &str,
        token: RefreshToken,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Count refresh tokens currently stored for a user
    async fn count_user_tokens(&self, user_id: i64) -> Result<usize, DomainError>;
}
