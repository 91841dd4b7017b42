//! Claims carried inside provider-issued credentials.

use serde::{Deserialize, Serialize};

/// Identity derived from a credential's payload. Never persisted; recomputed
/// from the stored credential set on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider subject identifier (`sub`)
    pub subject_id: String,
    /// `cognito:username`, else `sub`
    pub username: String,
    pub email: Option<String>,
    /// Expiry (seconds since epoch)
    pub expires_at: i64,
}

/// Payload fields as they appear on the wire. Everything is optional here so
/// that missing-claim failures are reported by the codec, not by serde.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    pub sub: Option<String>,
    #[serde(rename = "cognito:username")]
    pub cognito_username: Option<String>,
    pub email: Option<String>,
    pub exp: Option<serde_json::Number>,
}

impl RawClaims {
    pub(crate) fn expires_at(&self) -> Option<i64> {
        let exp = self.exp.as_ref()?;
        exp.as_i64()
            .or_else(|| exp.as_f64().map(|secs| secs.floor() as i64))
    }

    pub(crate) fn username(&self) -> Option<&str> {
        self.cognito_username
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.sub.as_deref())
    }
}
