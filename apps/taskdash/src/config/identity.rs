//! Identity provider endpoint and pool/client identifiers.
//!
//! A local emulation endpoint (`COGNITO_ENDPOINT`, e.g. cognito-local) wins
//! outright; otherwise the regional cloud endpoint is derived from
//! `AWS_REGION`. Missing identifiers are not an error here: they flow into
//! the protocol calls and the provider rejects them.

use crate::config::env_var;

pub const DEFAULT_REGION: &str = "ap-northeast-1";

pub const ENDPOINT_OVERRIDE_VAR: &str = "COGNITO_ENDPOINT";
pub const REGION_VAR: &str = "AWS_REGION";
pub const USER_POOL_ID_VAR: &str = "COGNITO_USER_POOL_ID";
pub const CLIENT_ID_VAR: &str = "COGNITO_CLIENT_ID";

/// Resolved identity provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub endpoint: String,
    pub user_pool_id: String,
    pub client_id: String,
}

impl IdentityConfig {
    /// Build from explicit values using the same precedence as [`from_env`].
    ///
    /// [`from_env`]: IdentityConfig::from_env
    pub fn resolve(
        endpoint_override: Option<&str>,
        region: Option<&str>,
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        let endpoint = match endpoint_override.filter(|e| !e.is_empty()) {
            Some(local) => local.to_string(),
            None => cloud_endpoint(region.filter(|r| !r.is_empty()).unwrap_or(DEFAULT_REGION)),
        };

        Self {
            endpoint,
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
        }
    }

    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::resolve(
            env_var(ENDPOINT_OVERRIDE_VAR).as_deref(),
            env_var(REGION_VAR).as_deref(),
            env_var(USER_POOL_ID_VAR).unwrap_or_default(),
            env_var(CLIENT_ID_VAR).unwrap_or_default(),
        )
    }
}

/// `https://cognito-idp.{region}.amazonaws.com`
pub fn cloud_endpoint(region: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com")
}

/// Where the protocol client gets its settings on each call.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Re-read the environment per call.
    Environment,
    /// Pinned settings (tests, command-line overrides).
    Fixed(IdentityConfig),
}

impl ConfigSource {
    pub fn resolve(&self) -> IdentityConfig {
        match self {
            ConfigSource::Environment => IdentityConfig::from_env(),
            ConfigSource::Fixed(config) => config.clone(),
        }
    }
}
