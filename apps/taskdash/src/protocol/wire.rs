//! JSON 1.1 request/response shapes of the Cognito user-pool API, and the
//! classification of raw replies into tagged results.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuthError;

pub const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
pub const TARGET_HEADER: &str = "X-Amz-Target";

const GENERIC_FAILURE: &str = "Authentication failed";

/// Named provider actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    InitiateAuth,
    SignUp,
    ConfirmSignUp,
    GlobalSignOut,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::InitiateAuth => "InitiateAuth",
            Action::SignUp => "SignUp",
            Action::ConfirmSignUp => "ConfirmSignUp",
            Action::GlobalSignOut => "GlobalSignOut",
        }
    }

    /// Value of the `X-Amz-Target` header.
    pub fn target(self) -> String {
        format!("{TARGET_PREFIX}.{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthFlow {
    UserPasswordAuth,
    RefreshTokenAuth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthRequest<'a> {
    pub auth_flow: AuthFlow,
    pub client_id: &'a str,
    pub auth_parameters: BTreeMap<&'static str, &'a str>,
}

impl<'a> InitiateAuthRequest<'a> {
    pub fn password(client_id: &'a str, username: &'a str, password: &'a str) -> Self {
        Self {
            auth_flow: AuthFlow::UserPasswordAuth,
            client_id,
            auth_parameters: BTreeMap::from([("USERNAME", username), ("PASSWORD", password)]),
        }
    }

    pub fn refresh(client_id: &'a str, refresh_token: &'a str) -> Self {
        Self {
            auth_flow: AuthFlow::RefreshTokenAuth,
            client_id,
            auth_parameters: BTreeMap::from([("REFRESH_TOKEN", refresh_token)]),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeType<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub user_attributes: Vec<AttributeType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfirmSignUpRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub confirmation_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSignOutRequest<'a> {
    pub access_token: &'a str,
}

/// `AuthenticationResult` member of an `InitiateAuth` reply. The refresh flow
/// omits `RefreshToken`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub access_token: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct InitiateAuthResponse {
    #[serde(default)]
    pub authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    pub challenge_name: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
}

/// Outcome of a password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(AuthenticationResult),
    /// The provider wants another step; not supported by this client.
    Challenge { name: String, session: Option<String> },
}

impl TryFrom<InitiateAuthResponse> for AuthOutcome {
    type Error = AuthError;

    fn try_from(resp: InitiateAuthResponse) -> Result<Self, Self::Error> {
        // A challenge takes precedence: some emulators echo an empty result alongside it.
        if let Some(name) = resp.challenge_name.filter(|n| !n.is_empty()) {
            return Ok(AuthOutcome::Challenge {
                name,
                session: resp.session,
            });
        }
        resp.authentication_result
            .map(AuthOutcome::Authenticated)
            .ok_or_else(|| AuthError::malformed("reply has neither AuthenticationResult nor ChallengeName"))
    }
}

/// New access/identity pair from the refresh flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewedTokens {
    pub access_token: String,
    pub id_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpOutcome {
    pub user_confirmed: bool,
    #[serde(default)]
    pub user_sub: Option<String>,
}

/// A raw provider reply classified by status.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply {
    Success(Value),
    Rejected(AuthError),
}

impl ProviderReply {
    pub fn classify(status: u16, body: Value) -> Self {
        if (200..300).contains(&status) {
            ProviderReply::Success(body)
        } else {
            ProviderReply::Rejected(provider_error(status, &body))
        }
    }

    /// Decode a success body into `T`; a rejection becomes its error.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, AuthError> {
        match self {
            ProviderReply::Success(body) => serde_json::from_value(body)
                .map_err(|e| AuthError::malformed(format!("unexpected reply shape: {e}"))),
            ProviderReply::Rejected(err) => Err(err),
        }
    }

    /// For actions whose success carries no payload.
    pub fn into_unit(self) -> Result<(), AuthError> {
        match self {
            ProviderReply::Success(_) => Ok(()),
            ProviderReply::Rejected(err) => Err(err),
        }
    }
}

/// Normalize an error body: `message` (or `Message`), else `__type`, else a
/// generic message.
fn provider_error(status: u16, body: &Value) -> AuthError {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let raw_type = field("__type");
    let kind = raw_type
        .as_deref()
        .map(|t| t.rsplit('#').next().unwrap_or(t).to_string());
    let message = field("message")
        .or_else(|| field("Message"))
        .or_else(|| raw_type.clone())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    AuthError::protocol(status, kind, message)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_password_request_shape() {
        let req = InitiateAuthRequest::password("client-1", "a@b.com", "pw");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": "client-1",
                "AuthParameters": { "PASSWORD": "pw", "USERNAME": "a@b.com" }
            })
        );
    }

    #[test]
    fn test_refresh_request_shape() {
        let req = InitiateAuthRequest::refresh("client-1", "rt");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "AuthFlow": "REFRESH_TOKEN_AUTH",
                "ClientId": "client-1",
                "AuthParameters": { "REFRESH_TOKEN": "rt" }
            })
        );
    }

    #[test]
    fn test_sign_up_request_shape() {
        let req = SignUpRequest {
            client_id: "c",
            username: "a@b.com",
            password: "pw",
            user_attributes: vec![AttributeType {
                name: "email",
                value: "a@b.com",
            }],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "ClientId": "c",
                "Username": "a@b.com",
                "Password": "pw",
                "UserAttributes": [{ "Name": "email", "Value": "a@b.com" }]
            })
        );
    }

    #[test]
    fn test_target_header_value() {
        assert_eq!(
            Action::GlobalSignOut.target(),
            "AWSCognitoIdentityProviderService.GlobalSignOut"
        );
    }

    #[test]
    fn test_error_message_precedence() {
        let err = provider_error(
            400,
            &json!({ "__type": "NotAuthorizedException", "message": "Incorrect username or password." }),
        );
        assert_eq!(err.to_string(), "Incorrect username or password.");
        assert_eq!(err.provider_kind(), Some("NotAuthorizedException"));

        let capitalized = provider_error(400, &json!({ "Message": "Capital M" }));
        assert_eq!(capitalized.to_string(), "Capital M");

        let type_only = provider_error(
            400,
            &json!({ "__type": "com.amazonaws.cognito#UsernameExistsException" }),
        );
        assert_eq!(type_only.to_string(), "com.amazonaws.cognito#UsernameExistsException");
        assert_eq!(type_only.provider_kind(), Some("UsernameExistsException"));

        let empty = provider_error(502, &serde_json::Value::Null);
        assert_eq!(empty.to_string(), "Authentication failed");
        assert!(matches!(empty, AuthError::Protocol { status: 502, kind: None, .. }));
    }

    #[test]
    fn test_challenge_takes_precedence() {
        let resp: InitiateAuthResponse = serde_json::from_value(json!({
            "ChallengeName": "SOFTWARE_TOKEN_MFA",
            "Session": "sess",
            "ChallengeParameters": {}
        }))
        .unwrap();

        assert_eq!(
            AuthOutcome::try_from(resp).unwrap(),
            AuthOutcome::Challenge {
                name: "SOFTWARE_TOKEN_MFA".to_string(),
                session: Some("sess".to_string()),
            }
        );
    }

    #[test]
    fn test_reply_without_result_or_challenge_is_malformed() {
        let resp: InitiateAuthResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            AuthOutcome::try_from(resp),
            Err(AuthError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_into_result_reports_shape_mismatch() {
        let reply = ProviderReply::classify(200, json!({ "UserConfirmed": "yes" }));
        assert!(matches!(
            reply.into_result::<SignUpOutcome>(),
            Err(AuthError::MalformedResponse { .. })
        ));
    }
}
