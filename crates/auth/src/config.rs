//! Authentication configuration

use std::time::Duration;

use tessera_common::Config;

/// Token signing and lifetime configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl,
            refresh_token_ttl,
        }
    }
}

impl From<&Config> for JwtConfig {
    fn from(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            Duration::from_secs(config.access_token_ttl),
            Duration::from_secs(config.refresh_token_ttl),
        )
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}
