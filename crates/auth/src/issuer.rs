//! Token pair issuance

use std::sync::Arc;
use std::time::Duration;

use tessera_common::Clock;
use uuid::Uuid;

use crate::claims::{
    AccessTokenPayload, RefreshTokenPayload, SubjectSnapshot, TokenPair, TokenType, TOKEN_ISSUER,
};
use crate::error::AuthError;
use crate::jwt::TokenCodec;

/// Mints access/refresh pairs that share one fresh revocation identifier.
///
/// Issuance touches no external state; nothing is persisted.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(
        codec: Arc<TokenCodec>,
        access_ttl: Duration,
        refresh_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            access_ttl,
            refresh_ttl,
            clock,
        }
    }

    pub fn issue(&self, subject: &SubjectSnapshot) -> Result<TokenPair, AuthError> {
        let jti = Uuid::new_v4().to_string();
        let issued_at = self.clock.now().timestamp();
        let sub = subject.user_id.to_string();

        tracing::debug!(user_id = %subject.user_id, jti = %jti, "Issuing token pair");

        let access = AccessTokenPayload {
            iss: TOKEN_ISSUER.to_string(),
            sub: sub.clone(),
            iat: issued_at,
            exp: expires_at(issued_at, self.access_ttl),
            jti: jti.clone(),
            token_type: TokenType::Access,
            username: subject.username.clone(),
            email: subject.email.clone(),
            role: subject.role.clone(),
            is_password_temp: subject.is_password_temp,
            is_enabled: subject.is_enabled,
            is_deleted: subject.is_deleted,
        };

        let refresh = RefreshTokenPayload {
            iss: TOKEN_ISSUER.to_string(),
            sub,
            iat: issued_at,
            exp: expires_at(issued_at, self.refresh_ttl),
            jti,
            token_type: TokenType::Refresh,
        };

        Ok(TokenPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: self.codec.encode(&refresh)?,
        })
    }
}

fn expires_at(issued_at: i64, ttl: Duration) -> i64 {
    issued_at.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}
