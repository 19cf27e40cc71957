//! Token service
//!
//! Bundles issuer, validator and revoker over one codec, one revocation
//! store and one clock. Constructed explicitly and passed to whatever needs
//! it; there is no process-wide instance.

use std::sync::Arc;

use tessera_cache::CacheStore;
use tessera_common::Clock;

use crate::claims::{AccessClaims, RefreshClaims, SubjectSnapshot, TokenPair, TokenType};
use crate::config::JwtConfig;
use crate::error::AuthError;
use crate::issuer::TokenIssuer;
use crate::jwt::TokenCodec;
use crate::revoker::TokenRevoker;
use crate::validator::TokenValidator;

/// Session token service.
///
/// Cheap to clone. Application states expose it to the extractors via
/// `FromRef`:
/// ```ignore
/// impl FromRef<AppState> for TokenService {
///     fn from_ref(state: &AppState) -> Self {
///         state.tokens.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct TokenService {
    issuer: TokenIssuer,
    validator: TokenValidator,
    revoker: TokenRevoker,
}

impl TokenService {
    pub fn new(config: JwtConfig, store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        let codec = Arc::new(TokenCodec::new(config.secret.as_bytes()));

        Self {
            issuer: TokenIssuer::new(
                codec.clone(),
                config.access_token_ttl,
                config.refresh_token_ttl,
                clock.clone(),
            ),
            validator: TokenValidator::new(codec, store.clone(), clock),
            revoker: TokenRevoker::new(store, config.refresh_token_ttl),
        }
    }

    pub fn issue(&self, subject: &SubjectSnapshot) -> Result<TokenPair, AuthError> {
        self.issuer.issue(subject)
    }

    pub async fn validate_access(&self, raw: &str) -> Result<AccessClaims, AuthError> {
        self.validator.validate_access(raw).await
    }

    pub async fn validate_refresh(&self, raw: &str) -> Result<RefreshClaims, AuthError> {
        self.validator.validate_refresh(raw).await
    }

    pub fn token_type(&self, raw: &str) -> Result<TokenType, AuthError> {
        self.validator.token_type(raw)
    }

    pub async fn revoke(&self, jti: &str) -> Result<(), AuthError> {
        self.revoker.revoke(jti).await
    }
}
