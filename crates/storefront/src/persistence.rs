//! Durable local snapshots for anonymous sessions.
//!
//! Each named key maps to one JSON file under the configured data
//! directory. Snapshots are rewritten on every store change and rehydrated
//! at startup. A corrupt or unreadable file is treated as absent: the user
//! loses a stale cart, never gets an error dialog.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Named snapshot keys.
pub mod keys {
    /// Anonymous cart lines and applied promo.
    pub const CART: &str = "cart";
    /// Anonymous wishlist items.
    pub const WISHLIST: &str = "wishlist";
    /// Persisted auth session (bearer token + user).
    pub const SESSION: &str = "session";
}

/// Errors that can occur when writing a snapshot.
///
/// Reads never error; see [`LocalStore::load`].
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem write failed.
    #[error("failed to write snapshot '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized.
    #[error("failed to serialize snapshot '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON-file-backed local storage.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load a snapshot, treating missing or corrupt data as absent.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(key, error = %e, "snapshot unreadable, treating as absent");
                }
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "snapshot corrupt, treating as absent");
                None
            }
        }
    }

    /// Write a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem write fails.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| {
            PersistError::Serialize {
                key: key.to_string(),
                source,
            }
        })?;
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Write {
            key: key.to_string(),
            source,
        })?;
        write_replacing(&self.path_for(key), &json).map_err(|source| PersistError::Write {
            key: key.to_string(),
            source,
        })
    }

    /// Delete a snapshot if it exists.
    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}

/// Write via a temp file and rename, so a crash mid-write leaves the old
/// snapshot rather than a truncated one.
fn write_replacing(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        count: u32,
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store.save(keys::CART, &Snapshot { count: 3 }).unwrap();
        let loaded: Option<Snapshot> = store.load(keys::CART);
        assert_eq!(loaded, Some(Snapshot { count: 3 }));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let loaded: Option<Snapshot> = store.load(keys::WISHLIST);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_snapshot_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("cart.json"), "{not json").unwrap();

        let loaded: Option<Snapshot> = store.load(keys::CART);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.save(keys::SESSION, &Snapshot { count: 1 }).unwrap();
        store.remove(keys::SESSION);
        let loaded: Option<Snapshot> = store.load(keys::SESSION);
        assert!(loaded.is_none());
    }
}
