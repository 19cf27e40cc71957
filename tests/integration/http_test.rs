//! HTTP integration tests
//!
//! Drives the session routes through `tower::ServiceExt::oneshot` and checks
//! the status code and error code each failure class maps to.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::Value;
use tessera_auth::{SubjectSnapshot, TokenService};
use tessera_cache::mock::UnavailableCache;
use tessera_common::Config;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{forge, subject, InMemorySubjects, TestHarness, TEST_SECRET};

fn request(method: Method, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn no_accounts() -> Arc<InMemorySubjects> {
    Arc::new(InMemorySubjects::new())
}

fn router_for(tokens: &TokenService, accounts: &[SubjectSnapshot]) -> Router {
    let subjects = no_accounts();
    for account in accounts {
        subjects.put(account.clone());
    }
    tessera_app::create_router(tokens.clone(), subjects)
}

fn config(backend: &str, redis_url: Option<&str>) -> Config {
    Config {
        jwt_secret: TEST_SECRET.to_string(),
        access_token_ttl: 3600,
        refresh_token_ttl: 86400,
        revocation_backend: backend.to_string(),
        redis_url: redis_url.map(str::to_string),
        rust_log: "tessera=debug".to_string(),
        port: 3000,
    }
}

mod test_session_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_valid_access_token() {
        let harness = TestHarness::new();
        let user = subject();
        let pair = harness.tokens.issue(&user).unwrap();
        let router = router_for(&harness.tokens, &[]);

        let (status, body) = send(
            &router,
            request(
                Method::GET,
                "/v0/auth/session",
                Some(&format!("Bearer {}", pair.access_token)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], user.user_id.to_string());
        assert_eq!(body["email"], user.email);
        assert_eq!(body["isPasswordTemp"], true);
    }

    #[tokio::test]
    async fn test_error_classes_map_to_distinct_codes() {
        let harness = TestHarness::new();
        let pair = harness.tokens.issue(&subject()).unwrap();
        let router = router_for(&harness.tokens, &[]);
        let foreign_alg = forge(&harness.access_payload(Uuid::new_v4()), Algorithm::HS512);

        let cases = [
            (None, "MISSING_AUTHORIZATION"),
            (Some("Token abc".to_string()), "INVALID_AUTHORIZATION"),
            (Some("Bearer ".to_string()), "INVALID_AUTHORIZATION"),
            (Some("Bearer not.a.jwt".to_string()), "INVALID_TOKEN"),
            (Some(format!("Bearer {foreign_alg}")), "INVALID_TOKEN"),
            (
                Some(format!("Bearer {}", pair.refresh_token)),
                "INVALID_TOKEN",
            ),
        ];

        for (authorization, code) in cases {
            let (status, body) = send(
                &router,
                request(Method::GET, "/v0/auth/session", authorization.as_deref()),
            )
            .await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization:?}");
            assert_eq!(body["error"]["code"], code, "{authorization:?}");
        }
    }

    #[tokio::test]
    async fn test_expired_token() {
        let harness = TestHarness::new();
        let pair = harness.tokens.issue(&subject()).unwrap();
        let router = router_for(&harness.tokens, &[]);

        harness.clock.advance(Duration::seconds(3601));

        let (status, body) = send(
            &router,
            request(
                Method::GET,
                "/v0/auth/session",
                Some(&format!("Bearer {}", pair.access_token)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn test_store_outage_hides_details() {
        let (tokens, _clock) = TestHarness::with_store(Arc::new(UnavailableCache::new()));
        let pair = tokens.issue(&subject()).unwrap();
        let router = router_for(&tokens, &[]);

        let (status, body) = send(
            &router,
            request(
                Method::GET,
                "/v0/auth/session",
                Some(&format!("Bearer {}", pair.access_token)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "REVOCATION_STORE_ERROR");
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("cache backend is down"));
    }
}

mod test_refresh_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_refresh_after_access_expiry() {
        let harness = TestHarness::new();
        let user = subject();
        let pair = harness.tokens.issue(&user).unwrap();
        let router = router_for(&harness.tokens, &[user.clone()]);

        harness.clock.advance(Duration::seconds(3601));

        let (status, body) = send(
            &router,
            request(
                Method::GET,
                "/v0/auth/refresh",
                Some(&format!("Bearer {}", pair.refresh_token)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let access = body["accessToken"].as_str().unwrap();
        let (status, body) = send(
            &router,
            request(Method::GET, "/v0/auth/session", Some(&format!("Bearer {access}"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], user.user_id.to_string());
    }

    #[tokio::test]
    async fn test_refresh_error_mapping() {
        let harness = TestHarness::new();
        let mut blocked = subject();
        blocked.is_enabled = false;
        let known = harness.tokens.issue(&blocked).unwrap();
        let unknown = harness.tokens.issue(&subject()).unwrap();
        let router = router_for(&harness.tokens, &[blocked]);

        let cases = [
            (known.access_token, StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            (known.refresh_token, StatusCode::FORBIDDEN, "USER_BLOCKED"),
            (unknown.refresh_token, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
        ];

        for (token, expected_status, code) in cases {
            let (status, body) = send(
                &router,
                request(Method::GET, "/v0/auth/refresh", Some(&format!("Bearer {token}"))),
            )
            .await;

            assert_eq!(status, expected_status, "{code}");
            assert_eq!(body["error"]["code"], code);
        }
    }
}

mod test_account_guards {
    use super::*;

    #[tokio::test]
    async fn test_session_rejects_stale_disabled_flag() {
        let harness = TestHarness::new();
        let mut user = subject();
        user.is_enabled = false;
        let pair = harness.tokens.issue(&user).unwrap();
        let router = router_for(&harness.tokens, &[]);

        let (status, body) = send(
            &router,
            request(
                Method::GET,
                "/v0/auth/session",
                Some(&format!("Bearer {}", pair.access_token)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "USER_BLOCKED");
    }
}

mod test_logout_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_logout_bans_whole_family() {
        let harness = TestHarness::new();
        let pair = harness.tokens.issue(&subject()).unwrap();
        let router = router_for(&harness.tokens, &[]);
        let bearer = format!("Bearer {}", pair.access_token);

        let (status, _) = send(
            &router,
            request(Method::POST, "/v0/auth/logout", Some(&bearer)),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &router,
            request(Method::POST, "/v0/auth/logout", Some(&bearer)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "TOKEN_BANNED");

        assert!(matches!(
            harness.tokens.validate_refresh(&pair.refresh_token).await,
            Err(tessera_auth::AuthError::BannedToken)
        ));
    }

    #[tokio::test]
    async fn test_logout_requires_access_token() {
        let harness = TestHarness::new();
        let pair = harness.tokens.issue(&subject()).unwrap();
        let router = router_for(&harness.tokens, &[]);

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/v0/auth/logout",
                Some(&format!("Bearer {}", pair.refresh_token)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
        assert!(harness.store.is_empty());
    }
}

mod test_composition {
    use super::*;

    #[tokio::test]
    async fn test_create_app_with_memory_backend() {
        let router = tessera_app::create_app(&config("memory", None), no_accounts()).unwrap();

        let response = router
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_create_app_rejects_unknown_backend() {
        assert!(tessera_app::create_app(&config("memcached", None), no_accounts()).is_err());
    }

    #[test]
    fn test_create_app_rejects_malformed_redis_url() {
        assert!(tessera_app::create_app(&config("redis", Some("not a url")), no_accounts()).is_err());
    }
}
