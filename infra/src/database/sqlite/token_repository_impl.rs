//! SQLite implementation of the TokenRepository trait.
//!
//! Multi-statement writes run inside one transaction; dropping the
//! transaction on an early return rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqliteConnection, SqlitePool};

use gk_core::domain::entities::token::{RefreshToken, RefreshTokenWithUser};
use gk_core::domain::entities::user::User;
use gk_core::errors::DomainError;
use gk_core::repositories::TokenRepository;

use super::column;
use crate::database::{from_millis, to_millis};

/// SQLite implementation of TokenRepository
pub struct SqliteTokenRepository {
    /// Database connection pool
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    /// Create a new SQLite token repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert a joined token/user row to its entities
    fn row_to_token_with_user(row: &SqliteRow) -> Result<RefreshTokenWithUser, DomainError> {
        let token = RefreshToken {
            id: column(row, "id")?,
            token: column(row, "token")?,
            user_id: column(row, "user_id")?,
            expires_at: from_millis(column(row, "expires_at")?)?,
            created_at: from_millis(column(row, "created_at")?)?,
        };
        let user = User {
            id: token.user_id,
            name: column(row, "user_name")?,
            email: column(row, "user_email")?,
            password_hash: column(row, "user_password_hash")?,
            created_at: from_millis(column(row, "user_created_at")?)?,
            updated_at: from_millis(column(row, "user_updated_at")?)?,
        };
        Ok(RefreshTokenWithUser { token, user })
    }

    async fn insert_token(
        conn: &mut SqliteConnection,
        mut token: RefreshToken,
    ) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&token.token)
            .bind(token.user_id)
            .bind(to_millis(token.expires_at))
            .bind(to_millis(token.created_at))
            .execute(conn)
            .await
            .map_err(|e| DomainError::store("Failed to save refresh token", e))?;

        token.id = result.last_insert_rowid();
        Ok(token)
    }

    async fn delete_for_user(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| DomainError::store("Failed to delete user refresh tokens", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| DomainError::store("Failed to acquire connection", e))?;
        Self::insert_token(&mut conn, token).await
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenWithUser>, DomainError> {
        let query = r#"
            SELECT t.id, t.token, t.user_id, t.expires_at, t.created_at,
                   u.name AS user_name, u.email AS user_email,
                   u.password_hash AS user_password_hash,
                   u.created_at AS user_created_at, u.updated_at AS user_updated_at
            FROM refresh_tokens t
            INNER JOIN users u ON u.id = t.user_id
            WHERE t.token = ?
        "#;

        let row = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::store("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_token_with_user).transpose()
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<usize, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| DomainError::store("Failed to acquire connection", e))?;
        let deleted = Self::delete_for_user(&mut conn, user_id).await?;
        Ok(deleted as usize)
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(to_millis(now))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store("Failed to delete expired refresh tokens", e))?;

        let deleted = result.rows_affected() as usize;
        tracing::debug!(deleted, "Deleted expired refresh tokens");
        Ok(deleted)
    }

    async fn replace_user_token(
        &self,
        user_id: i64,
        token: RefreshToken,
    ) -> Result<RefreshToken, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::store("Failed to begin transaction", e))?;

        Self::delete_for_user(&mut tx, user_id).await?;
        let saved = Self::insert_token(&mut tx, token).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::store("Failed to commit token replacement", e))?;
        Ok(saved)
    }

    async fn rotate_token(
        &self,
        previous: &str,
        token: RefreshToken,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::store("Failed to begin transaction", e))?;

        let owner: Option<i64> =
            sqlx::query_scalar("DELETE FROM refresh_tokens WHERE token = ? RETURNING user_id")
                .bind(previous)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::store("Failed to consume refresh token", e))?;

        let owner = match owner {
            Some(owner) => owner,
            None => {
                tx.rollback()
                    .await
                    .map_err(|e| DomainError::store("Failed to roll back rotation", e))?;
                return Ok(None);
            }
        };

        Self::delete_for_user(&mut tx, owner).await?;
        let saved = Self::insert_token(&mut tx, token).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::store("Failed to commit token rotation", e))?;
        Ok(Some(saved))
    }

    async fn count_user_tokens(&self, user_id: i64) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::store("Failed to count refresh tokens", e))?;
        Ok(count as usize)
    }
}
