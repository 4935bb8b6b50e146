use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gk_api::app::create_app;
use gk_api::middleware::auth::SessionAuthenticator;
use gk_api::routes::auth::AppState;
use gk_core::services::{
    AuthService, SessionGuard, TokenCleanupConfig, TokenCleanupService, TokenService,
    TokenServiceConfig,
};
use gk_infra::{BcryptCredentialHasher, DatabasePool, SqliteTokenRepository, SqliteUserRepository};
use gk_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Gatekeep API server");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to open database")?;
    pool.run_migrations()
        .await
        .context("Failed to run database migrations")?;

    let users = Arc::new(SqliteUserRepository::new(pool.get_pool().clone()));
    let tokens = Arc::new(SqliteTokenRepository::new(pool.get_pool().clone()));

    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig::from(&config.auth.jwt))
            .context("Invalid token configuration")?,
    );
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        tokens.clone(),
        token_service.clone(),
        Arc::new(BcryptCredentialHasher::new()),
    ));
    let authenticator: Arc<dyn SessionAuthenticator> =
        Arc::new(SessionGuard::new(users, token_service));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = Arc::new(TokenCleanupService::new(
        tokens,
        TokenCleanupConfig::from(&config.cleanup),
    ));
    let cleanup_handle = cleanup.spawn(shutdown_rx);

    let app_state = web::Data::new(AppState::new(auth_service));
    let session = web::Data::new(authenticator);
    let pool_data = web::Data::new(pool.clone());

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), session.clone(), pool_data.clone())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped, shutting down background tasks");
    let _ = shutdown_tx.send(true);
    if let Some(handle) = cleanup_handle {
        if let Err(e) = handle.await {
            tracing::warn!("Token cleanup task ended abnormally: {}", e);
        }
    }
    pool.close().await;

    Ok(())
}
