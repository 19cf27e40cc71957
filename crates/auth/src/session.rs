//! Session flows built on the token service: refresh and logout

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::claims::{AccessClaims, RefreshClaims, SubjectSnapshot, TokenPair};
use crate::error::AuthError;
use crate::service::TokenService;

/// Read access to current account state, supplied by the account store
#[async_trait::async_trait]
pub trait SubjectProvider: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<SubjectSnapshot>, AuthError>;
}

/// Account directory held in memory, for local development and tests
#[derive(Debug, Default)]
pub struct InMemorySubjects {
    users: RwLock<HashMap<Uuid, SubjectSnapshot>>,
}

impl InMemorySubjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the account with `subject.user_id`
    pub fn put(&self, subject: SubjectSnapshot) {
        self.users
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(subject.user_id, subject);
    }

    pub fn remove(&self, user_id: Uuid) -> Option<SubjectSnapshot> {
        self.users
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&user_id)
    }
}

#[async_trait::async_trait]
impl SubjectProvider for InMemorySubjects {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<SubjectSnapshot>, AuthError> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user_id)
            .cloned())
    }
}

#[derive(Clone)]
pub struct SessionService {
    tokens: TokenService,
    subjects: Arc<dyn SubjectProvider>,
}

impl SessionService {
    pub fn new(tokens: TokenService, subjects: Arc<dyn SubjectProvider>) -> Self {
        Self { tokens, subjects }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// Account state is re-read rather than copied from the old tokens, so a
    /// blocked account cannot extend its session. The presented family is
    /// left valid until it expires or is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.tokens.validate_refresh(refresh_token).await?;
        self.renew(&claims).await
    }

    /// Issue a new token pair for an already validated refresh token
    pub async fn renew(&self, claims: &RefreshClaims) -> Result<TokenPair, AuthError> {
        let subject = self
            .subjects
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claims.user_id, "Refresh for unknown user");
                AuthError::UserNotFound
            })?;

        if !subject.is_enabled {
            tracing::info!(user_id = %subject.user_id, "Refresh refused for blocked user");
            return Err(AuthError::UserBlocked);
        }

        tracing::info!(user_id = %subject.user_id, "Refreshing session tokens");
        self.tokens.issue(&subject)
    }

    /// End the session the access token belongs to
    pub async fn logout(&self, claims: &AccessClaims) -> Result<(), AuthError> {
        tracing::info!(user_id = %claims.user_id, jti = %claims.jti, "Logout");
        self.tokens.revoke(&claims.jti).await
    }
}
