use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::identity::ConfigSource;
use crate::error::AuthError;
use crate::protocol::transport::IdentityTransport;
use crate::protocol::wire::{
    Action, AttributeType, AuthOutcome, ConfirmSignUpRequest, GlobalSignOutRequest,
    InitiateAuthRequest, InitiateAuthResponse, ProviderReply, RenewedTokens, SignUpOutcome,
    SignUpRequest,
};

/// Issues the named identity-provider actions. Settings are resolved from
/// the [`ConfigSource`] on every call.
#[derive(Clone)]
pub struct IdentityClient {
    transport: Arc<dyn IdentityTransport>,
    config: ConfigSource,
}

impl IdentityClient {
    pub fn new(transport: Arc<dyn IdentityTransport>, config: ConfigSource) -> Self {
        Self { transport, config }
    }

    /// POST `payload` to the resolved endpoint and classify the reply.
    pub async fn invoke<P: Serialize>(
        &self,
        action: Action,
        payload: &P,
    ) -> Result<ProviderReply, AuthError> {
        let endpoint = self.config.resolve().endpoint;
        let body = serde_json::to_value(payload)
            .map_err(|e| AuthError::transport(format!("failed to encode {}: {e}", action.name())))?;

        let resp = self.transport.post(&endpoint, action, body).await?;
        let reply = ProviderReply::classify(resp.status, resp.body);
        if let ProviderReply::Rejected(err) = &reply {
            debug!(action = action.name(), code = err.code(), kind = ?err.provider_kind(), "Provider rejected request");
        }
        Ok(reply)
    }

    /// `USER_PASSWORD_AUTH` sign-in.
    pub async fn initiate_auth(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let config = self.config.resolve();
        let req = InitiateAuthRequest::password(&config.client_id, email, password);
        let resp: InitiateAuthResponse = self.invoke(Action::InitiateAuth, &req).await?.into_result()?;
        AuthOutcome::try_from(resp)
    }

    /// Register `email` with `email` as its email attribute.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let config = self.config.resolve();
        let req = SignUpRequest {
            client_id: &config.client_id,
            username: email,
            password,
            user_attributes: vec![AttributeType {
                name: "email",
                value: email,
            }],
        };
        self.invoke(Action::SignUp, &req).await?.into_result()
    }

    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let config = self.config.resolve();
        let req = ConfirmSignUpRequest {
            client_id: &config.client_id,
            username: email,
            confirmation_code: code,
        };
        self.invoke(Action::ConfirmSignUp, &req).await?.into_unit()
    }

    /// Revoke every credential issued to the access token's user.
    pub async fn global_sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let req = GlobalSignOutRequest { access_token };
        self.invoke(Action::GlobalSignOut, &req).await?.into_unit()
    }

    /// `REFRESH_TOKEN_AUTH`. The provider does not rotate the refresh
    /// credential here; callers keep the one they sent.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RenewedTokens, AuthError> {
        let config = self.config.resolve();
        let req = InitiateAuthRequest::refresh(&config.client_id, refresh_token);
        let resp: InitiateAuthResponse = self.invoke(Action::InitiateAuth, &req).await?.into_result()?;

        if let Some(name) = resp.challenge_name.filter(|n| !n.is_empty()) {
            return Err(AuthError::challenge(name));
        }
        let result = resp
            .authentication_result
            .ok_or_else(|| AuthError::malformed("refresh reply has no AuthenticationResult"))?;

        Ok(RenewedTokens {
            access_token: result.access_token,
            id_token: result.id_token,
        })
    }
}
