//! Session orchestration: sign-in/up/out, identity lookup and the
//! always-fresh-or-none access credential.
//!
//! Session state is never stored. It is recomputed from the persisted
//! credential set on every read, and routine freshness checks never return
//! an error: a session is either usable or gone.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::auth::claims::IdentityClaims;
use crate::auth::codec::{decode_claims, is_expired, now_epoch_millis};
use crate::auth::credentials::CredentialSet;
use crate::error::AuthError;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::protocol::client::IdentityClient;
use crate::protocol::wire::AuthOutcome;
use crate::store::TokenStore;

/// Epoch-milliseconds clock.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Derived authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated(IdentityClaims),
    Unauthenticated,
}

impl Session {
    pub fn user(&self) -> Option<&IdentityClaims> {
        match self {
            Session::Authenticated(claims) => Some(claims),
            Session::Unauthenticated => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignUpResult {
    pub needs_confirmation: bool,
}

pub struct SessionManager {
    client: IdentityClient,
    store: Arc<dyn TokenStore>,
    clock: Clock,
    /// Serializes refreshes so concurrent callers never race two refresh
    /// grants against each other.
    refresh_gate: Mutex<()>,
}

impl SessionManager {
    pub fn new(client: IdentityClient, store: Arc<dyn TokenStore>) -> Self {
        Self::with_clock(client, store, Arc::new(now_epoch_millis))
    }

    pub fn with_clock(client: IdentityClient, store: Arc<dyn TokenStore>, clock: Clock) -> Self {
        Self {
            client,
            store,
            clock,
            refresh_gate: Mutex::new(()),
        }
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Password sign-in. On success the new credential set is persisted and
    /// the identity it carries is returned; on any failure nothing is stored.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityClaims, AuthError> {
        let outcome = match self.client.initiate_auth(email, password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                security::sign_in_failed(e.code(), email);
                return Err(e);
            }
        };

        let result = match outcome {
            AuthOutcome::Authenticated(result) => result,
            AuthOutcome::Challenge { name, .. } => {
                security::sign_in_failed("CHALLENGE_REQUIRED", email);
                return Err(AuthError::challenge(name));
            }
        };

        let refresh_token = result
            .refresh_token
            .ok_or_else(|| AuthError::malformed("sign-in reply has no RefreshToken"))?;
        let tokens = CredentialSet::new(result.access_token, result.id_token, refresh_token)?;

        // Decode before persisting so an unreadable grant leaves no session behind.
        let claims = decode_claims(tokens.id_token()).map_err(|e| {
            security::sign_in_failed("UNREADABLE_ID_TOKEN", email);
            AuthError::malformed(format!("identity credential unreadable: {e}"))
        })?;

        self.store.save(&tokens)?;
        security::signed_in(&claims.subject_id, email);
        Ok(claims)
    }

    /// Register an account. Does not establish a session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, AuthError> {
        let outcome = self.client.sign_up(email, password).await?;
        info!(email = %Redacted(email), confirmed = outcome.user_confirmed, "Account registered");
        Ok(SignUpResult {
            needs_confirmation: !outcome.user_confirmed,
        })
    }

    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError> {
        self.client.confirm_sign_up(email, code).await?;
        info!(email = %Redacted(email), "Account confirmed");
        Ok(())
    }

    /// Best-effort remote revocation, then an unconditional local clear.
    pub async fn sign_out(&self) {
        if let Some(tokens) = self.store.load() {
            if let Err(e) = self.client.global_sign_out(tokens.access_token()).await {
                // Already-revoked or expired credentials land here; local sign-out proceeds.
                debug!(code = e.code(), error = %e, "Remote sign-out failed");
            }
        }
        self.store.clear();
        info!(event = "SIGNED_OUT", "Session cleared");
    }

    /// Identity of the stored, unexpired identity credential.
    ///
    /// Read-only and network-free: an expired credential yields `None`
    /// without a refresh. For display, not for authorization.
    pub fn current_user(&self) -> Option<IdentityClaims> {
        let tokens = self.store.load()?;
        if is_expired(tokens.id_token(), self.now()) {
            return None;
        }
        decode_claims(tokens.id_token()).ok()
    }

    pub fn session(&self) -> Session {
        match self.current_user() {
            Some(claims) => Session::Authenticated(claims),
            None => Session::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// A non-expired access credential, refreshing once if needed.
    ///
    /// Any refresh problem clears the stored session and yields `None`.
    pub async fn access_token(&self) -> Option<String> {
        let tokens = self.store.load()?;
        if !is_expired(tokens.access_token(), self.now()) {
            return Some(tokens.access_token().to_string());
        }

        let _guard = self.refresh_gate.lock().await;

        // Another caller may have renewed (or cleared) the set while we waited.
        let current = self.store.load()?;
        if !is_expired(current.access_token(), self.now()) {
            debug!("Using credential renewed by a concurrent caller");
            return Some(current.access_token().to_string());
        }

        match self.refresh(&current).await {
            Ok(renewed) => Some(renewed.access_token().to_string()),
            Err(e) => {
                security::session_invalidated(e.code());
                debug!(error = %e, "Refresh failed");
                self.store.clear();
                None
            }
        }
    }

    async fn refresh(&self, current: &CredentialSet) -> Result<CredentialSet, AuthError> {
        if current.refresh_token().is_empty() {
            return Err(AuthError::decode("no refresh credential stored"));
        }

        debug!("Access credential expired; refreshing");
        let renewed = self.client.refresh(current.refresh_token()).await?;
        let tokens = current.renewed(renewed.access_token, renewed.id_token)?;
        decode_claims(tokens.id_token())?;

        self.store.save(&tokens)?;
        info!(event = "SESSION_REFRESHED", "Credentials renewed");
        Ok(tokens)
    }
}
