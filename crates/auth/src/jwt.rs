//! JWT encoding, verification and token extraction helpers

use axum::http::HeaderValue;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::claims::TOKEN_ISSUER;
use crate::error::AuthError;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token whose signature and registered claims have been checked.
///
/// Role-specific fields are still untyped; the validator decodes them.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub subject: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub jti: String,
    payload: Map<String, Value>,
}

impl VerifiedToken {
    /// Raw `type` claim, if present and a string
    pub fn token_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }

    pub(crate) fn into_payload(self) -> Value {
        Value::Object(self.payload)
    }
}

/// HS256 signer/verifier bound to one secret.
///
/// Only HS256 is accepted on decode; tokens declaring any other algorithm,
/// including `none`, are rejected before their claims are read.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Claim checks run in `decode` against the injected clock
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign `claims` as a compact HS256 token
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "JWT signing failed");
            AuthError::Signing(e.to_string())
        })
    }

    /// Verify the signature, then the registered claims in order: issuer,
    /// issued-at, subject, expiry, token id. Expiry is judged against `now`.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, AuthError> {
        let token_data =
            decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation).map_err(
                |e| match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                    _ => {
                        tracing::debug!(error = %e, "JWT verification failed");
                        AuthError::InvalidToken
                    }
                },
            )?;
        let claims = token_data.claims;

        if claims.get("iss").and_then(Value::as_str) != Some(TOKEN_ISSUER) {
            return Err(rejected("issuer mismatch"));
        }

        let issued_at = claims
            .get("iat")
            .and_then(Value::as_i64)
            .ok_or_else(|| rejected("iat is missing"))?;

        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| rejected("sub is missing"))?
            .to_string();

        let expires_at = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| rejected("exp is missing"))?;

        let jti = claims
            .get("jti")
            .and_then(Value::as_str)
            .filter(|jti| !jti.is_empty())
            .ok_or_else(|| rejected("jti is missing"))?
            .to_string();

        if is_expired(expires_at, now) {
            tracing::debug!(jti = %jti, "JWT expired");
            return Err(AuthError::ExpiredToken);
        }

        Ok(VerifiedToken {
            subject,
            issued_at,
            expires_at,
            jti,
            payload: claims,
        })
    }
}

/// A token is expired from its `exp` second onwards
pub(crate) fn is_expired(expires_at: i64, now: DateTime<Utc>) -> bool {
    now.timestamp() >= expires_at
}

fn rejected(reason: &'static str) -> AuthError {
    tracing::debug!(reason, "JWT rejected");
    AuthError::InvalidToken
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
