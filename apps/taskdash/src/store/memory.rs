use parking_lot::Mutex;

use crate::auth::credentials::CredentialSet;
use crate::error::AuthError;
use crate::store::{parse_entry, serialize_entry, TokenStore};

/// In-process store holding the serialized entry, so it goes through the
/// same encode/parse path as the durable store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entry: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated with `tokens`.
    pub fn with_tokens(tokens: &CredentialSet) -> Result<Self, AuthError> {
        let store = Self::new();
        store.save(tokens)?;
        Ok(store)
    }

    /// Place arbitrary raw content under the key (corrupt-entry scenarios).
    pub fn put_raw(&self, raw: impl Into<String>) {
        *self.entry.lock() = Some(raw.into());
    }

    /// The raw stored entry, if any.
    pub fn raw(&self) -> Option<String> {
        self.entry.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.lock().is_none()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<CredentialSet> {
        let raw = self.entry.lock().clone()?;
        parse_entry(&raw)
    }

    fn save(&self, tokens: &CredentialSet) -> Result<(), AuthError> {
        let raw = serialize_entry(tokens)?;
        *self.entry.lock() = Some(raw);
        Ok(())
    }

    fn clear(&self) {
        self.entry.lock().take();
    }
}
