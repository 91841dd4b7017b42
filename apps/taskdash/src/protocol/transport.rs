//! Request/response seam between the action client and the network.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::error::AuthError;
use crate::protocol::wire::{self, Action};

/// Status and JSON body of one provider reply. A body that is not JSON is
/// carried as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// One POST of `body` to `endpoint` naming `action` in the target header.
#[async_trait]
pub trait IdentityTransport: Send + Sync {
    async fn post(
        &self,
        endpoint: &str,
        action: Action,
        body: Value,
    ) -> Result<TransportResponse, AuthError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        action: Action,
        body: Value,
    ) -> Result<TransportResponse, AuthError> {
        let payload = serde_json::to_vec(&body)
            .map_err(|e| AuthError::transport(format!("failed to encode request: {e}")))?;

        let resp = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static(wire::CONTENT_TYPE))
            .header(wire::TARGET_HEADER, action.target())
            .body(payload)
            .send()
            .await
            .map_err(|e| AuthError::transport(format!("{} request failed: {e}", action.name())))?;

        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AuthError::transport(format!("failed to read reply body: {e}")))?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        debug!(action = action.name(), status, "Identity provider replied");
        Ok(TransportResponse { status, body })
    }
}
