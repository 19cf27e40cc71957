//! Axum extractors for session tokens
//!
//! Generic over any state `S` where `TokenService: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::claims::{AccessClaims, RefreshClaims};
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;
use crate::service::TokenService;

fn bearer_token(parts: &Parts) -> Result<String, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?;

    extract_bearer_token(auth_header)
}

/// Caller holding a valid, unrevoked access token
#[derive(Debug)]
pub struct AuthUser(pub AccessClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = tokens.validate_access(&token).await?;

        Ok(AuthUser(claims))
    }
}

/// Role name carried by regular accounts
pub const ROLE_USER: &str = "user";
/// Role name carried by administrators
pub const ROLE_ADMIN: &str = "admin";

/// Reject claims whose account is blocked or deleted.
///
/// Judged on the flags captured at issuance, so a change to the account is
/// seen at the latest when the access token expires.
pub fn ensure_active(claims: &AccessClaims) -> Result<(), AuthError> {
    if !claims.is_enabled {
        tracing::debug!(user_id = %claims.user_id, "Blocked user rejected");
        return Err(AuthError::UserBlocked);
    }
    if claims.is_deleted {
        tracing::debug!(user_id = %claims.user_id, "Deleted user rejected");
        return Err(AuthError::UserDeleted);
    }
    Ok(())
}

/// Reject claims whose role is not one of `roles`
pub fn ensure_role(claims: &AccessClaims, roles: &[&str]) -> Result<(), AuthError> {
    if roles.contains(&claims.role.as_str()) {
        return Ok(());
    }
    tracing::debug!(user_id = %claims.user_id, role = %claims.role, "Role not permitted");
    Err(AuthError::AccessDenied)
}

/// Authenticated user whose account is enabled and not deleted.
///
/// Like `AuthUser` but rejects blocked accounts with `UserBlocked` and
/// deleted accounts with `UserDeleted` (both 403 FORBIDDEN).
#[derive(Debug)]
pub struct ActiveUser(pub AccessClaims);

impl<S> FromRequestParts<S> for ActiveUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        ensure_active(&claims)?;

        Ok(ActiveUser(claims))
    }
}

/// Active user holding the admin role.
///
/// Other roles are rejected with `AccessDenied` (403 FORBIDDEN).
#[derive(Debug)]
pub struct AdminUser(pub AccessClaims);

impl<S> FromRequestParts<S> for AdminUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let ActiveUser(claims) = ActiveUser::from_request_parts(parts, state).await?;
        ensure_role(&claims, &[ROLE_ADMIN])?;

        Ok(AdminUser(claims))
    }
}

/// Caller presenting a refresh token, for the token refresh endpoint.
///
/// Access tokens are rejected with `InvalidToken`.
#[derive(Debug)]
pub struct RefreshUser(pub RefreshClaims);

impl<S> FromRequestParts<S> for RefreshUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = tokens.validate_refresh(&token).await?;

        Ok(RefreshUser(claims))
    }
}
