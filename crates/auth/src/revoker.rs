//! Credential family revocation

use std::sync::Arc;
use std::time::Duration;

use tessera_cache::{cache_key, CacheStore};

use crate::error::AuthError;

/// Namespace for denylist entries in the shared cache
pub const BANNED_TOKEN_PREFIX: &str = "banned-token";

pub(crate) fn banned_token_key(jti: &str) -> String {
    cache_key(BANNED_TOKEN_PREFIX, jti)
}

/// Writes denylist entries.
///
/// Entries live as long as a refresh token, so a ban always outlasts every
/// token of the family it covers.
#[derive(Clone)]
pub struct TokenRevoker {
    store: Arc<dyn CacheStore>,
    ban_ttl: Duration,
}

impl TokenRevoker {
    pub fn new(store: Arc<dyn CacheStore>, ban_ttl: Duration) -> Self {
        Self { store, ban_ttl }
    }

    /// Ban the family identified by `jti`. Banning twice is harmless.
    pub async fn revoke(&self, jti: &str) -> Result<(), AuthError> {
        if jti.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        tracing::debug!(jti = %jti, "Revoking token family");

        self.store
            .set_with_ttl(&banned_token_key(jti), jti, self.ban_ttl)
            .await
            .map_err(|e| {
                tracing::error!(jti = %jti, error = %e, "Failed to write token ban");
                AuthError::Store(e)
            })
    }
}
