//! Local persistence of the credential set.
//!
//! One entry under [`STORAGE_KEY`], JSON-encoded, no schema version. Anything
//! that fails to parse (corrupt file, older or newer shape) loads as "no
//! session" rather than an error.

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use tracing::warn;

use crate::auth::credentials::CredentialSet;
use crate::error::AuthError;

/// Fixed key of the persisted credential entry.
pub const STORAGE_KEY: &str = "cognito_tokens";

/// Injectable credential storage.
pub trait TokenStore: Send + Sync {
    /// The stored set, or `None` when absent or unreadable.
    fn load(&self) -> Option<CredentialSet>;

    /// Replace the stored entry entirely.
    fn save(&self, tokens: &CredentialSet) -> Result<(), AuthError>;

    /// Remove the entry. Idempotent.
    fn clear(&self);
}

/// Shared parse step for stores holding the serialized entry.
pub(crate) fn parse_entry(raw: &str) -> Option<CredentialSet> {
    match serde_json::from_str::<CredentialSet>(raw) {
        Ok(tokens) => Some(tokens),
        Err(e) => {
            warn!(key = STORAGE_KEY, error = %e, "Ignoring unreadable credential entry");
            None
        }
    }
}

pub(crate) fn serialize_entry(tokens: &CredentialSet) -> Result<String, AuthError> {
    serde_json::to_string(tokens)
        .map_err(|e| AuthError::storage(format!("failed to serialize credentials: {e}")))
}
