use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::{debug, warn};

use crate::auth::credentials::CredentialSet;
use crate::error::AuthError;
use crate::store::{parse_entry, serialize_entry, TokenStore, STORAGE_KEY};

/// Durable store: `<profile_dir>/cognito_tokens.json`.
///
/// Writes go to a sibling temp file that is renamed over the entry, under an
/// exclusive OS lock on `<profile_dir>/cognito_tokens.lock`, so a concurrent
/// reader in another process sees either the old or the new entry.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    entry_path: PathBuf,
    lock_path: PathBuf,
}

impl FileTokenStore {
    pub fn new(profile_dir: impl AsRef<Path>) -> Self {
        let dir = profile_dir.as_ref();
        Self {
            entry_path: dir.join(format!("{STORAGE_KEY}.json")),
            lock_path: dir.join(format!("{STORAGE_KEY}.lock")),
        }
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    fn tmp_path(&self) -> PathBuf {
        self.entry_path.with_extension("json.tmp")
    }

    /// Run `f` while holding the lock file; shared for reads, exclusive for writes.
    fn with_lock<T>(
        &self,
        exclusive: bool,
        f: impl FnOnce() -> std::io::Result<T>,
    ) -> std::io::Result<T> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)?;

        // Fully qualified: std's inherent File locking methods would otherwise shadow these.
        if exclusive {
            FileExt::lock_exclusive(&lock_file)?;
        } else {
            FileExt::lock_shared(&lock_file)?;
        }
        let result = f();
        if let Err(e) = FileExt::unlock(&lock_file) {
            debug!(lock_path = %self.lock_path.display(), error = %e, "Lock release failed; dropped with file");
        }
        result
    }

    fn write_entry(&self, raw: &str) -> std::io::Result<()> {
        let tmp = self.tmp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(raw.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.entry_path)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<CredentialSet> {
        // Don't create the profile directory just to find nothing in it.
        if !self.entry_path.exists() {
            return None;
        }
        let read = self.with_lock(false, || fs::read_to_string(&self.entry_path));
        match read {
            Ok(raw) => parse_entry(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.entry_path.display(), error = %e, "Credential entry unreadable");
                None
            }
        }
    }

    fn save(&self, tokens: &CredentialSet) -> Result<(), AuthError> {
        let raw = serialize_entry(tokens)?;
        self.with_lock(true, || self.write_entry(&raw)).map_err(|e| {
            AuthError::storage(format!(
                "failed to write {}: {e}",
                self.entry_path.display()
            ))
        })
    }

    fn clear(&self) {
        if !self.entry_path.exists() {
            return;
        }
        let removed = self.with_lock(true, || match fs::remove_file(&self.entry_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        });
        if let Err(e) = removed {
            warn!(path = %self.entry_path.display(), error = %e, "Failed to clear credential entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::FileTokenStore;
    use crate::auth::credentials::CredentialSet;
    use crate::store::TokenStore;

    fn tokens(tag: &str) -> CredentialSet {
        CredentialSet::new(format!("access-{tag}"), format!("id-{tag}"), format!("refresh-{tag}"))
            .unwrap()
    }

    #[test]
    fn test_round_trip_creates_profile_dir() {
        let tmp = TempDir::new().unwrap();
        let store = FileTokenStore::new(tmp.path().join("nested/profile"));

        assert_eq!(store.load(), None);
        store.save(&tokens("1")).unwrap();
        assert_eq!(store.load(), Some(tokens("1")));
    }

    #[test]
    fn test_entry_is_camel_case_json() {
        let tmp = TempDir::new().unwrap();
        let store = FileTokenStore::new(tmp.path());
        store.save(&tokens("x")).unwrap();

        let raw = fs::read_to_string(store.entry_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["accessToken"], "access-x");
        assert_eq!(value["idToken"], "id-x");
        assert_eq!(value["refreshToken"], "refresh-x");
    }

    #[test]
    fn test_save_replaces_and_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = FileTokenStore::new(tmp.path());
        store.save(&tokens("1")).unwrap();
        store.save(&tokens("2")).unwrap();

        assert_eq!(store.load(), Some(tokens("2")));
        assert!(!store.entry_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_entry_loads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileTokenStore::new(tmp.path());
        fs::write(store.entry_path(), "\u{0}\u{1}garbage").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = FileTokenStore::new(tmp.path());
        store.clear();
        store.save(&tokens("1")).unwrap();
        store.clear();
        store.clear();

        assert!(!store.entry_path().exists());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_unused_profile_is_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let profile = tmp.path().join("never-used");
        let store = FileTokenStore::new(&profile);

        assert_eq!(store.load(), None);
        store.clear();

        assert!(!profile.exists());
    }

    #[test]
    fn test_two_handles_share_the_entry() {
        let tmp = TempDir::new().unwrap();
        let writer = FileTokenStore::new(tmp.path());
        let reader = FileTokenStore::new(tmp.path());

        writer.save(&tokens("shared")).unwrap();
        assert_eq!(reader.load(), Some(tokens("shared")));
        reader.clear();
        assert_eq!(writer.load(), None);
    }
}
