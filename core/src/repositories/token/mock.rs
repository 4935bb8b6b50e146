//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Barrier, Mutex, RwLock};

use crate::domain::entities::token::{RefreshToken, RefreshTokenWithUser};
use crate::errors::DomainError;
use crate::repositories::user::{MockUserRepository, UserRepository};

use super::trait_::TokenRepository;

/// Mock token repository for testing
///
/// Joins against a [`MockUserRepository`] the way the SQL store joins against
/// the users table. Every write holds the lock for its whole duration, which
/// gives the same all-or-nothing behavior as a transaction.
pub struct MockTokenRepository {
    users: Arc<MockUserRepository>,
    tokens: Arc<RwLock<Vec<RefreshToken>>>,
    next_id: AtomicI64,
    failing: AtomicBool,
    lookup_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository backed by the given users
    pub fn new(users: Arc<MockUserRepository>) -> Self {
        Self {
            users,
            tokens: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
            lookup_barrier: Mutex::new(None),
        }
    }

    /// Hold the next `parties` lookups until all of them have read the store
    pub async fn sync_next_lookups(&self, parties: usize) {
        *self.lookup_barrier.lock().await = Some(Arc::new(Barrier::new(parties)));
    }

    /// Make every subsequent call fail with a store error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of every stored token
    pub async fn all_tokens(&self) -> Vec<RefreshToken> {
        self.tokens.read().await.clone()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::store("Mock token store", "unavailable"));
        }
        Ok(())
    }

    fn insert(
        &self,
        tokens: &mut Vec<RefreshToken>,
        mut token: RefreshToken,
    ) -> Result<RefreshToken, DomainError> {
        if tokens.iter().any(|t| t.token == token.token) {
            return Err(DomainError::store("Failed to save refresh token", "duplicate token"));
        }
        token.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        tokens.push(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        self.insert(&mut tokens, token)
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenWithUser>, DomainError> {
        self.check()?;
        let found = {
            let tokens = self.tokens.read().await;
            tokens.iter().find(|t| t.token == token).cloned()
        };

        let barrier = self.lookup_barrier.lock().await.clone();
        if let Some(barrier) = barrier {
            if barrier.wait().await.is_leader() {
                *self.lookup_barrier.lock().await = None;
            }
        }

        match found {
            Some(token) => Ok(self
                .users
                .find_by_id(token.user_id)
                .await?
                .map(|user| RefreshTokenWithUser { token, user })),
            None => Ok(None),
        }
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<usize, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|t| !t.is_expired_at(now));
        Ok(before - tokens.len())
    }

    async fn replace_user_token(
        &self,
        user_id: i64,
        token: RefreshToken,
    ) -> Result<RefreshToken, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        let mut staged: Vec<RefreshToken> = tokens
            .iter()
            .filter(|t| t.user_id != user_id)
            .cloned()
            .collect();
        let saved = self.insert(&mut staged, token)?;
        *tokens = staged;
        Ok(saved)
    }

    async fn rotate_token(
        &self,
        previous: &str,
        token: RefreshToken,
    ) -> Result<Option<RefreshToken>, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        let owner = match tokens.iter().find(|t| t.token == previous) {
            Some(existing) => existing.user_id,
            None => return Ok(None),
        };

        let mut staged: Vec<RefreshToken> = tokens
            .iter()
            .filter(|t| t.user_id != owner)
            .cloned()
            .collect();
        let saved = self.insert(&mut staged, token)?;
        *tokens = staged;
        Ok(Some(saved))
    }

    async fn count_user_tokens(&self, user_id: i64) -> Result<usize, DomainError> {
        self.check()?;
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().filter(|t| t.user_id == user_id).count())
    }
}
