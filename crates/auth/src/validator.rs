//! Token validation
//!
//! Each entry point runs the same pipeline: signature and registered claims
//! (`TokenCodec::decode`), role tag, full typed shape of the role's payload,
//! an expiry re-check against the injected clock, then the denylist lookup.
//! A token that fails any step is rejected whole; no partial claim set is
//! ever returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tessera_cache::CacheStore;
use tessera_common::Clock;
use uuid::Uuid;

use crate::claims::{
    AccessClaims, AccessTokenPayload, RefreshClaims, RefreshTokenPayload, TokenType,
};
use crate::error::AuthError;
use crate::jwt::{is_expired, TokenCodec, VerifiedToken};
use crate::revoker::banned_token_key;

#[derive(Clone)]
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            store,
            clock,
        }
    }

    /// Validate an access token and return its full claim set
    pub async fn validate_access(&self, raw: &str) -> Result<AccessClaims, AuthError> {
        tracing::debug!("Validating access token");

        let payload: AccessTokenPayload = self.verify_shape(raw, TokenType::Access)?;
        let user_id = parse_subject(&payload.sub)?;
        let exp = self.ensure_not_expired(payload.exp)?;
        self.ensure_not_banned(&payload.jti).await?;

        Ok(AccessClaims {
            user_id,
            username: payload.username,
            email: payload.email,
            role: payload.role,
            is_password_temp: payload.is_password_temp,
            is_enabled: payload.is_enabled,
            is_deleted: payload.is_deleted,
            jti: payload.jti,
            exp,
        })
    }

    /// Validate a refresh token and return its claim set
    pub async fn validate_refresh(&self, raw: &str) -> Result<RefreshClaims, AuthError> {
        tracing::debug!("Validating refresh token");

        let payload: RefreshTokenPayload = self.verify_shape(raw, TokenType::Refresh)?;
        let user_id = parse_subject(&payload.sub)?;
        let exp = self.ensure_not_expired(payload.exp)?;
        self.ensure_not_banned(&payload.jti).await?;

        Ok(RefreshClaims {
            user_id,
            jti: payload.jti,
            exp,
        })
    }

    /// Role tag of a verified token.
    ///
    /// Checks signature and registered claims only; it does not consult the
    /// denylist or the role-specific fields.
    pub fn token_type(&self, raw: &str) -> Result<TokenType, AuthError> {
        let verified = self.codec.decode(raw, self.clock.now())?;
        role_of(&verified)
    }

    fn verify_shape<T: DeserializeOwned>(
        &self,
        raw: &str,
        expected: TokenType,
    ) -> Result<T, AuthError> {
        let verified = self.codec.decode(raw, self.clock.now())?;

        let actual = role_of(&verified)?;
        if actual != expected {
            tracing::debug!(expected = %expected, actual = %actual, "Incorrect token type");
            return Err(AuthError::InvalidToken);
        }

        serde_json::from_value(verified.into_payload()).map_err(|e| {
            tracing::debug!(error = %e, token_type = %expected, "Token claims have the wrong shape");
            AuthError::InvalidToken
        })
    }

    fn ensure_not_expired(&self, exp: i64) -> Result<DateTime<Utc>, AuthError> {
        if is_expired(exp, self.clock.now()) {
            tracing::debug!(exp, "Token expired");
            return Err(AuthError::ExpiredToken);
        }

        DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidToken)
    }

    async fn ensure_not_banned(&self, jti: &str) -> Result<(), AuthError> {
        let entry = self
            .store
            .get(&banned_token_key(jti))
            .await
            .map_err(|e| {
                tracing::error!(jti = %jti, error = %e, "Failed to check token ban");
                AuthError::Store(e)
            })?;

        match entry {
            None => Ok(()),
            Some(_) => {
                tracing::warn!(jti = %jti, "Banned token presented");
                Err(AuthError::BannedToken)
            }
        }
    }
}

fn role_of(verified: &VerifiedToken) -> Result<TokenType, AuthError> {
    verified
        .token_type()
        .and_then(TokenType::parse)
        .ok_or_else(|| {
            tracing::debug!(jti = %verified.jti, "Token type is missing or unknown");
            AuthError::InvalidToken
        })
}

fn parse_subject(sub: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(sub).map_err(|_| {
        tracing::debug!("Token subject is not a UUID");
        AuthError::InvalidToken
    })
}
