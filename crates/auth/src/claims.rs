//! Token claim types
//!
//! Two layers: the wire payloads that are signed into tokens (flat maps with
//! the fixed claim keys), and the typed claim sets handed to callers after
//! validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of the `iss` claim on every token this crate mints
pub const TOKEN_ISSUER: &str = "tessera";

/// Role tag carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }

    /// Parse a role tag; unknown tags yield `None`
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "access" => Some(TokenType::Access),
            "refresh" => Some(TokenType::Refresh),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account state captured at issuance time.
///
/// Supplied by the account store; the access token embeds these values
/// until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSnapshot {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_password_temp: bool,
    pub is_enabled: bool,
    pub is_deleted: bool,
}

/// Validated claims of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_password_temp: bool,
    pub is_enabled: bool,
    pub is_deleted: bool,
    /// Revocation identifier shared with the paired refresh token
    pub jti: String,
    pub exp: DateTime<Utc>,
}

/// Validated claims of a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub jti: String,
    pub exp: DateTime<Utc>,
}

/// Access + refresh token minted together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signed payload of an access token
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessTokenPayload {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "IsPasswordTemp")]
    pub is_password_temp: bool,
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
}

/// Signed payload of a refresh token. Carries no account state.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RefreshTokenPayload {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}
