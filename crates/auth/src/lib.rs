//! Session tokens for Tessera
//!
//! Issues HS256-signed access/refresh pairs, validates them against a
//! revocation denylist, and provides axum extractors that work with any
//! state implementing `FromRef<S>` for `TokenService`.

mod claims;
mod config;
mod error;
mod extractors;
mod issuer;
mod jwt;
mod revoker;
mod service;
mod session;
mod validator;

pub use claims::{AccessClaims, RefreshClaims, SubjectSnapshot, TokenPair, TokenType, TOKEN_ISSUER};
pub use config::JwtConfig;
pub use error::AuthError;
pub use extractors::{
    ensure_active, ensure_role, ActiveUser, AdminUser, AuthUser, RefreshUser, ROLE_ADMIN, ROLE_USER,
};
pub use issuer::TokenIssuer;
pub use jwt::{extract_bearer_token, TokenCodec, VerifiedToken};
pub use revoker::{TokenRevoker, BANNED_TOKEN_PREFIX};
pub use service::TokenService;
pub use session::{InMemorySubjects, SessionService, SubjectProvider};
pub use validator::TokenValidator;
