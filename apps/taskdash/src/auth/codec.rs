//! Unverified claim decoding for provider-issued credentials.
//!
//! NOT A VERIFIER. Nothing here checks a signature, issuer or audience. The
//! decoded claims drive local state only (who is shown as signed in, whether
//! a refresh is due). Any authorization decision must be made server-side
//! against the raw bearer credential.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use time::OffsetDateTime;

use crate::auth::claims::{IdentityClaims, RawClaims};
use crate::error::AuthError;

/// base64url with optional padding; payload segments are normally unpadded.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Some emulators emit the standard alphabet in payload segments.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Decode the claim payload (second `.`-separated segment) of `token`.
///
/// Errors with `AuthError::Decode` when the token is empty, has no payload
/// segment, the segment is not base64url, not a JSON object, or lacks the
/// `sub`/`exp` claims.
pub fn decode_claims(token: &str) -> Result<IdentityClaims, AuthError> {
    let raw = decode_raw(token)?;

    let expires_at = raw
        .expires_at()
        .ok_or_else(|| AuthError::decode("missing or non-numeric exp claim"))?;
    let subject_id = raw
        .sub
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::decode("missing sub claim"))?;
    let username = raw.username().unwrap_or(&subject_id).to_string();

    Ok(IdentityClaims {
        subject_id,
        username,
        email: raw.email,
        expires_at,
    })
}

/// Fail-closed expiry check: a token whose payload does not decode, or
/// carries no numeric `exp`, counts as expired. Only `exp` is consulted.
pub fn is_expired(token: &str, now_epoch_millis: i64) -> bool {
    match decode_raw(token).ok().and_then(|raw| raw.expires_at()) {
        Some(exp) => i128::from(now_epoch_millis) >= i128::from(exp) * 1000,
        None => true,
    }
}

fn decode_raw(token: &str) -> Result<RawClaims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::decode("empty token"));
    }

    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| AuthError::decode("token has no payload segment"))?;

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .map_err(|e| AuthError::decode(format!("payload is not base64url: {e}")))?;

    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::decode(format!("payload is not JSON: {e}")))?;
    if !value.is_object() {
        return Err(AuthError::decode("payload is not a JSON object"));
    }

    serde_json::from_value(value).map_err(|e| AuthError::decode(format!("invalid claims: {e}")))
}
