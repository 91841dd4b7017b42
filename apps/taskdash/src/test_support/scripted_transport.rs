use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::AuthError;
use crate::protocol::transport::{IdentityTransport, TransportResponse};
use crate::protocol::wire::Action;

/// One request as the transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub action: Action,
    pub body: Value,
}

type Scripted = Result<TransportResponse, AuthError>;

/// Replies are queued per action and consumed in order. An action with no
/// queued reply fails with a transport error, so an unexpected call shows up
/// as a failed refresh/sign-in rather than hanging.
///
/// Every reply yields to the scheduler once before resolving, which lets
/// concurrent callers interleave the way they would on a real network.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<&'static str, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 reply.
    pub fn push_ok(&self, action: Action, body: Value) {
        self.push(action, Ok(TransportResponse { status: 200, body }));
    }

    /// Queue a non-success reply.
    pub fn push_error(&self, action: Action, status: u16, body: Value) {
        self.push(action, Ok(TransportResponse { status, body }));
    }

    /// Queue a failure that never reached the provider.
    pub fn push_transport_failure(&self, action: Action, detail: &str) {
        self.push(action, Err(AuthError::transport(detail)));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls for `action`.
    pub fn count(&self, action: Action) -> usize {
        self.calls.lock().iter().filter(|c| c.action == action).count()
    }

    /// Recorded `InitiateAuth` calls using the refresh flow.
    pub fn refresh_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.action == Action::InitiateAuth && c.body["AuthFlow"] == "REFRESH_TOKEN_AUTH")
            .count()
    }

    fn push(&self, action: Action, reply: Scripted) {
        self.replies
            .lock()
            .entry(action.name())
            .or_default()
            .push_back(reply);
    }
}

#[async_trait]
impl IdentityTransport for ScriptedTransport {
    async fn post(
        &self,
        endpoint: &str,
        action: Action,
        body: Value,
    ) -> Result<TransportResponse, AuthError> {
        self.calls.lock().push(RecordedCall {
            endpoint: endpoint.to_string(),
            action,
            body,
        });
        let reply = self
            .replies
            .lock()
            .get_mut(action.name())
            .and_then(VecDeque::pop_front);

        tokio::task::yield_now().await;

        reply.unwrap_or_else(|| {
            Err(AuthError::transport(format!(
                "no scripted reply for {}",
                action.name()
            )))
        })
    }
}
