//! Bearer token authentication middleware for protecting API endpoints.
//!
//! The middleware reads the `Authorization` header, resolves the caller
//! through the session authenticator registered in app data and injects the
//! authenticated user into the request extensions.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use gk_core::{
    domain::entities::user::User,
    errors::{AuthError, DomainError},
    repositories::UserRepository,
    services::session::SessionGuard,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use crate::handlers::ApiError;

/// Trait object seam so the middleware is not generic over repositories
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate(&self, authorization: Option<&str>) -> Result<User, DomainError>;
}

#[async_trait]
impl<U: UserRepository + 'static> SessionAuthenticator for SessionGuard<U> {
    async fn authenticate(&self, authorization: Option<&str>) -> Result<User, DomainError> {
        SessionGuard::authenticate(self, authorization).await
    }
}

/// App data entry holding the session authenticator
pub type SessionData = web::Data<Arc<dyn SessionAuthenticator>>;

/// The caller of a protected endpoint
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Bearer authentication middleware factory
#[derive(Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let authenticator = match req.app_data::<SessionData>() {
                Some(authenticator) => authenticator.clone(),
                None => {
                    tracing::error!("Session authenticator is not registered");
                    return Err(ApiError::from(DomainError::Internal {
                        message: "Session authenticator is not registered".to_string(),
                    })
                    .into());
                }
            };

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .map(|value| value.to_str().map(str::to_owned));
            let header = match header {
                Some(Ok(value)) => Some(value),
                Some(Err(_)) => {
                    return Err(ApiError::from(DomainError::from(AuthError::Unauthenticated)).into())
                }
                None => None,
            };

            let user = authenticator
                .authenticate(header.as_deref())
                .await
                .map_err(ApiError::from)?;

            req.extensions_mut().insert(AuthenticatedUser(user));

            service.call(req).await
        })
    }
}

/// Extractor for required authentication
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::from(DomainError::from(AuthError::Unauthenticated)).into());

        ready(result)
    }
}
