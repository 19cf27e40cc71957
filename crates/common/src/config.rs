//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

const DEFAULT_ACCESS_TOKEN_TTL: u64 = 3600;
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 86400;
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone)]
pub struct Config {
    /// HMAC secret used to sign and verify session tokens
    pub jwt_secret: String,

    /// Token lifetimes, in seconds
    pub access_token_ttl: u64,
    pub refresh_token_ttl: u64,

    /// Revocation store backend ("memory" or "redis")
    pub revocation_backend: String,
    pub redis_url: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let access_token_ttl = parse_secs("JWT_ACCESS_TOKEN_TTL", DEFAULT_ACCESS_TOKEN_TTL)?;
        let refresh_token_ttl = parse_secs("JWT_REFRESH_TOKEN_TTL", DEFAULT_REFRESH_TOKEN_TTL)?;
        if access_token_ttl >= refresh_token_ttl {
            anyhow::bail!(
                "JWT_ACCESS_TOKEN_TTL ({}) must be shorter than JWT_REFRESH_TOKEN_TTL ({})",
                access_token_ttl,
                refresh_token_ttl
            );
        }

        let revocation_backend =
            env::var("REVOCATION_BACKEND").unwrap_or_else(|_| "memory".to_string());
        let redis_url = env::var("REDIS_URL").ok();
        if revocation_backend == "redis" && redis_url.is_none() {
            anyhow::bail!("REDIS_URL is required when REVOCATION_BACKEND=redis");
        }

        let config = Self {
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            revocation_backend,
            redis_url,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "tessera=debug".to_string()),
            port: parse_port()?,
        };

        Ok(config)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("revocation_backend", &self.revocation_backend)
            .field("redis_url", &self.redis_url)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

fn parse_secs(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_port() -> Result<u16> {
    match env::var("PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {:?}", raw)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}
