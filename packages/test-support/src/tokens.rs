//! Minted identity tokens for tests.
//!
//! Tokens are HS256-signed with a fixed test key. The client never verifies
//! signatures, so the only thing that matters is the payload shape.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;

const TEST_SIGNING_KEY: &[u8] = b"taskdash_test_signing_key_not_a_secret";

/// Current Unix time in seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before 1970")
        .as_secs() as i64
}

#[derive(Debug, Clone, Serialize)]
struct PoolClaims {
    sub: String,
    #[serde(rename = "cognito:username", skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    token_use: &'static str,
    iat: i64,
    exp: i64,
}

/// Builder for a user-pool style token.
///
/// ```
/// use test_support::tokens::TokenBuilder;
///
/// let token = TokenBuilder::new("sub-1").email("a@example.test").expires_in(60).mint();
/// assert_eq!(token.split('.').count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    claims: PoolClaims,
}

impl TokenBuilder {
    pub fn new(sub: &str) -> Self {
        let now = now_secs();
        Self {
            claims: PoolClaims {
                sub: sub.to_string(),
                username: None,
                email: None,
                token_use: "id",
                iat: now,
                exp: now + 3600,
            },
        }
    }

    pub fn username(mut self, username: &str) -> Self {
        self.claims.username = Some(username.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.claims.email = Some(email.to_string());
        self
    }

    /// Mark as an access token (`token_use = "access"`).
    pub fn access(mut self) -> Self {
        self.claims.token_use = "access";
        self
    }

    /// Absolute expiry, Unix seconds.
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.claims.exp = exp;
        self
    }

    /// Expiry relative to now. Negative values produce an already-expired token.
    pub fn expires_in(mut self, secs: i64) -> Self {
        self.claims.exp = now_secs() + secs;
        self
    }

    pub fn mint(&self) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &self.claims,
            &EncodingKey::from_secret(TEST_SIGNING_KEY),
        )
        .expect("failed to encode test token")
    }
}

/// Identity token for `sub`/`email`, valid for `ttl_secs`.
pub fn id_token(sub: &str, email: &str, ttl_secs: i64) -> String {
    TokenBuilder::new(sub)
        .username(sub)
        .email(email)
        .expires_in(ttl_secs)
        .mint()
}

/// Access token for `sub`, valid for `ttl_secs`.
pub fn access_token(sub: &str, ttl_secs: i64) -> String {
    TokenBuilder::new(sub).access().expires_in(ttl_secs).mint()
}

/// Unsigned three-segment token carrying an arbitrary JSON payload.
pub fn token_with_payload(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.sig")
}
