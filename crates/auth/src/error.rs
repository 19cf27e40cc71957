//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tessera_cache::CacheError;

/// Authentication error
///
/// `InvalidToken`, `ExpiredToken` and `BannedToken` stay distinct so callers
/// can start a refresh flow on expiry only.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingAuthorization,

    #[error("Invalid authorization header format")]
    InvalidAuthorizationFormat,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token has been revoked")]
    BannedToken,

    /// The revocation store could not answer. Never treated as "not revoked".
    #[error("Revocation store error: {0}")]
    Store(#[from] CacheError),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("User not found")]
    UserNotFound,

    #[error("User is blocked")]
    UserBlocked,

    #[error("User is deleted")]
    UserDeleted,

    #[error("Access denied")]
    AccessDenied,

    #[error("Failed to load user: {0}")]
    UserLoadError(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthorization
            | AuthError::InvalidAuthorizationFormat
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::BannedToken
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::UserBlocked | AuthError::UserDeleted | AuthError::AccessDenied => {
                StatusCode::FORBIDDEN
            }
            AuthError::Store(_) | AuthError::Signing(_) | AuthError::UserLoadError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "MISSING_AUTHORIZATION",
            AuthError::InvalidAuthorizationFormat => "INVALID_AUTHORIZATION",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "TOKEN_EXPIRED",
            AuthError::BannedToken => "TOKEN_BANNED",
            AuthError::Store(_) => "REVOCATION_STORE_ERROR",
            AuthError::Signing(_) => "TOKEN_SIGNING_ERROR",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UserBlocked => "USER_BLOCKED",
            AuthError::UserDeleted => "USER_DELETED",
            AuthError::AccessDenied => "ACCESS_DENIED",
            AuthError::UserLoadError(_) => "USER_LOAD_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Backend details stay in the logs
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Authentication failed");
            "Authentication failed".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
