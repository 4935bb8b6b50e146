//! Access token authentication for protected operations

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// Returns `None` when the prefix is missing or the token is empty.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the caller of a protected operation from its access token
pub struct SessionGuard<U: UserRepository> {
    user_repository: Arc<U>,
    token_service: Arc<TokenService>,
}

impl<U: UserRepository> SessionGuard<U> {
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Authenticate a request from its raw `Authorization` header
    ///
    /// Every credential problem collapses into `AuthError::Unauthenticated`;
    /// only store failures surface as something else.
    pub async fn authenticate(&self, authorization: Option<&str>) -> DomainResult<User> {
        let header = authorization.ok_or_else(|| {
            debug!("Authorization header is missing");
            DomainError::Auth(AuthError::Unauthenticated)
        })?;

        let token = extract_bearer_token(header).ok_or_else(|| {
            debug!("Authorization header is not a bearer token");
            DomainError::Auth(AuthError::Unauthenticated)
        })?;

        let claims = self.token_service.verify_access(token).map_err(|e| {
            warn!(error = %e, "Access token rejected");
            DomainError::Auth(AuthError::Unauthenticated)
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Auth(AuthError::Unauthenticated))?;

        match self.user_repository.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id, "Access token refers to a missing user");
                Err(AuthError::Unauthenticated.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::entities::user::NewUser;
    use crate::errors::ErrorKind;
    use crate::repositories::MockUserRepository;
    use crate::services::token::TokenServiceConfig;

    struct Fixture {
        guard: SessionGuard<MockUserRepository>,
        users: Arc<MockUserRepository>,
        tokens: Arc<TokenService>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(MockUserRepository::new());
        let tokens = Arc::new(
            TokenService::new(TokenServiceConfig::new("access-secret", "refresh-secret"))
                .unwrap(),
        );
        let user = users
            .create(NewUser::new("Ann", "ann@x.io", "hash"))
            .await
            .unwrap();

        Fixture {
            guard: SessionGuard::new(users.clone(), tokens.clone()),
            users,
            tokens,
            user,
        }
    }

    fn assert_unauthenticated(result: DomainResult<User>) {
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::Unauthenticated))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc.def"), None);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let f = fixture().await;
        let token = f.tokens.issue_access(&f.user).unwrap();
        let header = format!("Bearer {}", token);

        let user = f.guard.authenticate(Some(&header)).await.unwrap();
        assert_eq!(user.id, f.user.id);
        assert_eq!(user.email, "ann@x.io");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let f = fixture().await;
        assert_unauthenticated(f.guard.authenticate(None).await);
    }

    #[tokio::test]
    async fn test_header_without_bearer_prefix() {
        let f = fixture().await;
        let token = f.tokens.issue_access(&f.user).unwrap();

        assert_unauthenticated(f.guard.authenticate(Some(&token)).await);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let f = fixture().await;
        let token = f
            .tokens
            .issue_access_at(&f.user, Utc::now() - Duration::minutes(16))
            .unwrap();
        let header = format!("Bearer {}", token);

        assert_unauthenticated(f.guard.authenticate(Some(&header)).await);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_accepted() {
        let f = fixture().await;
        let (token, _) = f.tokens.issue_refresh().unwrap();
        let header = format!("Bearer {}", token);

        assert_unauthenticated(f.guard.authenticate(Some(&header)).await);
    }

    #[tokio::test]
    async fn test_deleted_user() {
        let f = fixture().await;
        let token = f.tokens.issue_access(&f.user).unwrap();
        f.users.remove(f.user.id).await;
        let header = format!("Bearer {}", token);

        assert_unauthenticated(f.guard.authenticate(Some(&header)).await);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let f = fixture().await;
        let token = f.tokens.issue_access(&f.user).unwrap();
        f.users.set_failing(true);
        let header = format!("Bearer {}", token);

        let err = f.guard.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
    }
}
