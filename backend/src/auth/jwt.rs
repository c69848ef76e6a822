//! Session and static client tokens (HS256 JWTs).
//!
//! Session tokens carry `{ user_id, iat, exp, jti }` and are signed with the
//! API secret. The static client token sent as `t` on session creation is a
//! JWT signed with a separate static key; any claims are accepted, and `exp`
//! is enforced only when present.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

use super::error::AuthError;

/// Default session lifetime (10 hours).
pub const DEFAULT_TOKEN_LIFETIME_SEC: u64 = 10 * 3600;

const MAX_TOKEN_LIFETIME_SEC: i64 = 365 * 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    static_encoding: EncodingKey,
    static_decoding: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    pub fn new(secret: &str, static_key: &str, lifetime_sec: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            static_encoding: EncodingKey::from_secret(static_key.as_bytes()),
            static_decoding: DecodingKey::from_secret(static_key.as_bytes()),
            lifetime: Duration::seconds(
                i64::try_from(lifetime_sec)
                    .unwrap_or(MAX_TOKEN_LIFETIME_SEC)
                    .min(MAX_TOKEN_LIFETIME_SEC),
            ),
        }
    }

    /// Issue a session token for `user_id`.
    pub fn encode(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry of a session token.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Verify the static client token.
    pub fn verify_static(&self, token: &str) -> Result<(), AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;
        decode::<Value>(token, &self.static_decoding, &validation)
            .map(|_| ())
            .map_err(|_| AuthError::InvalidStaticToken)
    }

    /// Mint a static client token, as distributed to API clients.
    pub fn issue_static(&self, client: &str) -> Result<String, AuthError> {
        let claims = serde_json::json!({ "client": client });
        encode(&Header::new(Algorithm::HS256), &claims, &self.static_encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}
