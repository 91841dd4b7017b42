#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;

use serde_json::{json, Value};
use taskdash::test_support::ScriptedTransport;
use taskdash::{
    ConfigSource, CredentialSet, IdentityClient, IdentityConfig, MemoryTokenStore, SessionManager,
};
use test_support::tokens::{access_token, id_token};

#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

pub const LOCAL_ENDPOINT: &str = "http://localhost:9229";

/// A session manager wired to a scripted provider and an in-memory store.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MemoryTokenStore>,
    pub manager: SessionManager,
}

pub fn harness() -> Harness {
    harness_with_store(MemoryTokenStore::new())
}

pub fn harness_with_store(store: MemoryTokenStore) -> Harness {
    let transport = Arc::new(ScriptedTransport::new());
    let store = Arc::new(store);
    let config = IdentityConfig::resolve(Some(LOCAL_ENDPOINT), None, "local_pool", "local_client");
    let client = IdentityClient::new(transport.clone(), ConfigSource::Fixed(config));
    let manager = SessionManager::new(client, store.clone());
    Harness {
        transport,
        store,
        manager,
    }
}

/// Credential set for `sub` with the given lifetimes in seconds (negative = expired).
pub fn credential_set(sub: &str, email: &str, access_ttl: i64, id_ttl: i64) -> CredentialSet {
    CredentialSet::new(
        access_token(sub, access_ttl),
        id_token(sub, email, id_ttl),
        format!("refresh-{sub}"),
    )
    .expect("valid credential set")
}

/// `InitiateAuth` success body.
pub fn grant(access: &str, id: &str, refresh: Option<&str>) -> Value {
    let mut result = json!({
        "AccessToken": access,
        "IdToken": id,
        "ExpiresIn": 3600,
        "TokenType": "Bearer",
    });
    if let Some(refresh) = refresh {
        result["RefreshToken"] = json!(refresh);
    }
    json!({ "AuthenticationResult": result })
}
