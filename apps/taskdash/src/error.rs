//! Error taxonomy for the identity/session client.
//!
//! Only the sign-in, sign-up and confirmation flows surface these to callers.
//! Freshness checks (`current_user`, `access_token`) resolve every failure
//! into "no session" instead of returning an error.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity provider rejected the request (bad credentials,
    /// duplicate account, invalid code, ...). `message` is the provider's
    /// own text and is meant for the end user.
    #[error("{message}")]
    Protocol {
        status: u16,
        kind: Option<String>,
        message: String,
    },
    /// The provider demands an additional step (MFA, new password, ...)
    /// this client does not implement.
    #[error("Authentication challenge required: {challenge}")]
    ChallengeRequired { challenge: String },
    /// A credential does not decode to usable claims.
    #[error("Token decode error: {detail}")]
    Decode { detail: String },
    /// The request never produced a provider response.
    #[error("Transport error: {detail}")]
    Transport { detail: String },
    /// The provider answered with a success status but an unusable body.
    #[error("Malformed provider response: {detail}")]
    MalformedResponse { detail: String },
    /// Durable credential storage failed.
    #[error("Token storage error: {detail}")]
    Storage { detail: String },
}

impl AuthError {
    pub fn protocol(status: u16, kind: Option<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn challenge(challenge: impl Into<String>) -> Self {
        Self::ChallengeRequired {
            challenge: challenge.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
        }
    }

    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage {
            detail: detail.into(),
        }
    }

    /// Provider error type with any `namespace#` prefix removed,
    /// e.g. `NotAuthorizedException`.
    pub fn provider_kind(&self) -> Option<&str> {
        match self {
            AuthError::Protocol { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }

    /// Stable short code for logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Protocol { .. } => "PROVIDER_REJECTED",
            AuthError::ChallengeRequired { .. } => "CHALLENGE_REQUIRED",
            AuthError::Decode { .. } => "TOKEN_DECODE",
            AuthError::Transport { .. } => "TRANSPORT",
            AuthError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            AuthError::Storage { .. } => "STORAGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuthError;

    #[test]
    fn test_protocol_error_displays_provider_message_verbatim() {
        let err = AuthError::protocol(
            400,
            Some("NotAuthorizedException".to_string()),
            "Incorrect username or password.",
        );
        assert_eq!(err.to_string(), "Incorrect username or password.");
        assert_eq!(err.provider_kind(), Some("NotAuthorizedException"));
        assert_eq!(err.code(), "PROVIDER_REJECTED");
    }

    #[test]
    fn test_challenge_error_names_the_challenge() {
        let err = AuthError::challenge("NEW_PASSWORD_REQUIRED");
        assert_eq!(
            err.to_string(),
            "Authentication challenge required: NEW_PASSWORD_REQUIRED"
        );
        assert_eq!(err.provider_kind(), None);
    }

    #[test]
    fn test_codes_are_unique() {
        let all = [
            AuthError::protocol(400, None, "x"),
            AuthError::challenge("x"),
            AuthError::decode("x"),
            AuthError::transport("x"),
            AuthError::malformed("x"),
            AuthError::storage("x"),
        ];
        let mut codes: Vec<_> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
