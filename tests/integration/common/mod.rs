//! Common test utilities and fixtures for integration tests
//!
//! Every harness owns its own in-memory revocation store and manual clock,
//! so tests never share bans or time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tessera_auth::{JwtConfig, SessionService, SubjectSnapshot, TokenService, TOKEN_ISSUER};
use tessera_cache::{CacheStore, MemoryCache};
use tessera_common::ManualClock;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_only";
pub const ACCESS_TTL_SECS: u64 = 3600;
pub const REFRESH_TTL_SECS: u64 = 86400;

/// Token service wired to an inspectable store and a controllable clock
#[allow(dead_code)]
pub struct TestHarness {
    pub tokens: TokenService,
    pub store: MemoryCache,
    pub clock: ManualClock,
}

#[allow(dead_code)]
impl TestHarness {
    pub fn new() -> Self {
        let store = MemoryCache::new();
        let clock = ManualClock::starting_now();
        let tokens = TokenService::new(
            jwt_config(),
            Arc::new(store.clone()),
            Arc::new(clock.clone()),
        );

        Self {
            tokens,
            store,
            clock,
        }
    }

    /// Harness whose token service talks to `store` instead of the in-memory one
    pub fn with_store(store: Arc<dyn CacheStore>) -> (TokenService, ManualClock) {
        let clock = ManualClock::starting_now();
        let tokens = TokenService::new(jwt_config(), store, Arc::new(clock.clone()));
        (tokens, clock)
    }

    pub fn now(&self) -> DateTime<Utc> {
        tessera_common::Clock::now(&self.clock)
    }

    /// Registered claims of a well-formed access token issued "now"
    pub fn access_payload(&self, user_id: Uuid) -> Value {
        let now = self.now().timestamp();
        json!({
            "iss": TOKEN_ISSUER,
            "sub": user_id.to_string(),
            "iat": now,
            "exp": now + ACCESS_TTL_SECS as i64,
            "jti": Uuid::new_v4().to_string(),
            "type": "access",
            "username": "grace",
            "email": "grace@example.com",
            "role": "user",
            "IsPasswordTemp": false,
            "isEnabled": true,
            "isDeleted": false,
        })
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(
        TEST_SECRET,
        Duration::from_secs(ACCESS_TTL_SECS),
        Duration::from_secs(REFRESH_TTL_SECS),
    )
}

#[allow(dead_code)]
pub fn subject() -> SubjectSnapshot {
    SubjectSnapshot {
        user_id: Uuid::new_v4(),
        username: "grace".to_string(),
        email: "grace@example.com".to_string(),
        role: "user".to_string(),
        is_password_temp: true,
        is_enabled: true,
        is_deleted: false,
    }
}

/// Sign an arbitrary payload with the test secret
#[allow(dead_code)]
pub fn forge(payload: &Value, algorithm: Algorithm) -> String {
    jsonwebtoken::encode(
        &Header::new(algorithm),
        payload,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

#[allow(unused_imports)]
pub use tessera_auth::InMemorySubjects;

#[allow(dead_code)]
pub fn sessions(tokens: &TokenService, subjects: Arc<InMemorySubjects>) -> SessionService {
    SessionService::new(tokens.clone(), subjects)
}
