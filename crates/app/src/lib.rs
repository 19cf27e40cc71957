//! Tessera application composition root
//!
//! Builds the revocation store and token service from configuration and
//! mounts the session routes.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tessera_auth::{
    AccessClaims, ActiveUser, AuthError, AuthUser, JwtConfig, RefreshUser, SessionService,
    SubjectProvider, TokenPair, TokenService,
};
use tessera_cache::{CacheConfig, CacheStore, CacheStoreFactory};
use tessera_common::{Config, SystemClock};

/// Shared state for the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.tokens().clone()
    }
}

/// Build the token service described by `config`
pub fn create_token_service(config: &Config) -> Result<TokenService, anyhow::Error> {
    let store = CacheStoreFactory::create(CacheConfig {
        provider: config.revocation_backend.clone(),
        redis_url: config.redis_url.clone(),
    })?;

    tracing::info!(
        backend = store.backend_name(),
        access_ttl = config.access_token_ttl,
        refresh_ttl = config.refresh_token_ttl,
        "Token service configured"
    );

    Ok(TokenService::new(
        JwtConfig::from(config),
        store,
        Arc::new(SystemClock),
    ))
}

/// Create the main application router over the given account store
pub fn create_app(
    config: &Config,
    subjects: Arc<dyn SubjectProvider>,
) -> Result<Router, anyhow::Error> {
    let tokens = create_token_service(config)?;
    Ok(create_router(tokens, subjects))
}

/// Mount all routes over an already built token service
pub fn create_router(tokens: TokenService, subjects: Arc<dyn SubjectProvider>) -> Router {
    let state = AppState {
        sessions: SessionService::new(tokens, subjects),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/v0/auth/session", get(current_session))
        .route("/v0/auth/refresh", get(refresh))
        .route("/v0/auth/logout", post(logout))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// GET /v0/auth/session - claims of the caller's access token
async fn current_session(ActiveUser(claims): ActiveUser) -> Json<AccessClaims> {
    Json(claims)
}

/// GET /v0/auth/refresh - new token pair for a refresh token
async fn refresh(
    State(state): State<AppState>,
    RefreshUser(claims): RefreshUser,
) -> Result<Json<TokenPair>, AuthError> {
    let pair = state.sessions.renew(&claims).await?;
    Ok(Json(pair))
}

/// POST /v0/auth/logout - revoke the caller's token family
async fn logout(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<StatusCode, AuthError> {
    state.sessions.logout(&claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
