//! Tests for the authentication service

use chrono::{Duration, Utc};

use super::mocks::create_test_context;
use crate::domain::entities::token::RefreshToken;
use crate::domain::entities::user::NewUser;
use crate::errors::{AuthError, DomainError, ErrorKind};
use crate::repositories::{TokenRepository, UserRepository};

#[tokio::test]
async fn test_register_returns_populated_response() {
    let ctx = create_test_context();

    let response = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(response.expires_in, 900);
    assert_eq!(response.user.name, "Ann");
    assert_eq!(response.user.email, "ann@x.com");

    let stored = ctx.users.find_by_email("ann@x.com").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "hashed:secret12");
    assert_eq!(ctx.tokens.count_user_tokens(stored.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = create_test_context();
    ctx.service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    let err = ctx
        .service
        .register("Ann Again", "ann@x.com", "another1")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::Conflict)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_access_token_identifies_user() {
    let ctx = create_test_context();
    let response = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    let claims = ctx.token_service.verify_access(&response.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), response.user.id);
    assert_eq!(claims.email, "ann@x.com");
}

#[tokio::test]
async fn test_login_replaces_refresh_token() {
    let ctx = create_test_context();
    let registered = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    let logged_in = ctx.service.login("ann@x.com", "secret12").await.unwrap();

    assert_ne!(registered.refresh_token, logged_in.refresh_token);
    let tokens = ctx.tokens.all_tokens().await;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token, logged_in.refresh_token);

    let err = ctx
        .service
        .refresh(&registered.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = create_test_context();
    ctx.service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    let unknown = ctx
        .service
        .login("nobody@x.com", "secret12")
        .await
        .unwrap_err();
    let wrong = ctx
        .service
        .login("ann@x.com", "wrong-password")
        .await
        .unwrap_err();

    assert!(matches!(unknown, DomainError::Auth(AuthError::InvalidCredentials)));
    assert!(matches!(wrong, DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.to_string(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_with_unreadable_hash_is_invalid_credentials() {
    let ctx = create_test_context();
    ctx.users
        .create(NewUser::new("Bo", "bo@x.com", "$2b$corrupted"))
        .await
        .unwrap();

    let err = ctx.service.login("bo@x.com", "secret12").await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let ctx = create_test_context();
    let first = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    let second = ctx.service.refresh(&first.refresh_token).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(second.user.id, first.user.id);
    assert_eq!(second.expires_in, 900);

    let tokens = ctx.tokens.all_tokens().await;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token, second.refresh_token);

    let reuse = ctx.service.refresh(&first.refresh_token).await.unwrap_err();
    assert!(matches!(reuse, DomainError::Auth(AuthError::InvalidToken)));

    assert!(ctx.service.refresh(&second.refresh_token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_refresh_loses_rotation_race() {
    let ctx = create_test_context();
    let registered = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    // Both refreshes see the record before either rotates it.
    ctx.tokens.sync_next_lookups(2).await;
    let (a, b) = tokio::join!(
        ctx.service.refresh(&registered.refresh_token),
        ctx.service.refresh(&registered.refresh_token),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    for result in [a, b] {
        if let Err(err) = result {
            assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
        }
    }
    assert_eq!(
        ctx.tokens
            .count_user_tokens(registered.user.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let ctx = create_test_context();

    let err = ctx.service.refresh("not-a-token").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_refresh_with_unrecorded_token() {
    let ctx = create_test_context();
    let (token, _) = ctx.token_service.issue_refresh().unwrap();

    let err = ctx.service.refresh(&token).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_refresh_with_expired_record_revokes_session() {
    let ctx = create_test_context();
    let registered = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();
    let user_id = registered.user.id;

    let (token, _) = ctx.token_service.issue_refresh().unwrap();
    let expired = RefreshToken::new(token.clone(), user_id, Utc::now() - Duration::seconds(1));
    ctx.tokens.replace_user_token(user_id, expired).await.unwrap();

    let err = ctx.service.refresh(&token).await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::Expired)));
    assert_eq!(err.kind(), ErrorKind::Expired);
    assert_eq!(ctx.tokens.count_user_tokens(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_refresh_for_deleted_user() {
    let ctx = create_test_context();
    let registered = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();
    ctx.users.remove(registered.user.id).await;

    let err = ctx
        .service
        .refresh(&registered.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_logout_then_refresh_is_rejected() {
    let ctx = create_test_context();
    let registered = ctx
        .service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();

    ctx.service.logout(registered.user.id).await.unwrap();

    assert_eq!(
        ctx.tokens
            .count_user_tokens(registered.user.id)
            .await
            .unwrap(),
        0
    );
    let err = ctx
        .service
        .refresh(&registered.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let ctx = create_test_context();

    assert!(ctx.service.logout(999).await.is_ok());
    assert!(ctx.service.logout(999).await.is_ok());
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let ctx = create_test_context();
    ctx.service
        .register("Ann", "ann@x.com", "secret12")
        .await
        .unwrap();
    ctx.tokens.set_failing(true);

    let err = ctx.service.login("ann@x.com", "secret12").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreFailure);

    ctx.users.set_failing(true);
    let err = ctx
        .service
        .register("Bob", "bob@x.com", "secret12")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreFailure);
}
