//! Logged-in display name and the key/value storage that keeps it.
//!
//! The session is a single optional name. It is read from storage once when
//! the store is opened and written through on login and logout. There is no
//! server-side validation of the name.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::LOGGED_NAME_KEY;
use crate::modal::{Modal, ModalHost};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access storage file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key/value store.
pub trait Storage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage kept as a JSON object in a single file.
///
/// A missing file reads as empty; the file and its parent directory are
/// created on first write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(map).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-process storage, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Shared handle to the logged-in display name.
#[derive(Clone)]
pub struct SessionStore {
    name: Arc<RwLock<Option<String>>>,
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Open the store, reading the persisted name once.
    ///
    /// An unreadable store starts logged out.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let initial = match storage.get(LOGGED_NAME_KEY) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read stored session, starting logged out: {e}");
                None
            }
        };
        debug!(logged_in = initial.is_some(), "Session store opened");

        Self {
            name: Arc::new(RwLock::new(initial)),
            storage,
        }
    }

    /// The current display name.
    #[must_use]
    pub fn logged_name(&self) -> Option<String> {
        self.name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set and persist the display name. A blank name logs out instead.
    pub fn login(&self, name: &str) {
        if name.trim().is_empty() {
            self.logout();
            return;
        }

        *self.name.write().unwrap_or_else(PoisonError::into_inner) = Some(name.to_string());
        if let Err(e) = self.storage.set(LOGGED_NAME_KEY, name) {
            warn!("Failed to persist session: {e}");
        }
        info!(name = %name, "Logged in");
    }

    /// Clear the display name from memory and storage.
    pub fn logout(&self) {
        let previous = self
            .name
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Err(e) = self.storage.remove(LOGGED_NAME_KEY) {
            warn!("Failed to clear stored session: {e}");
        }
        if let Some(name) = previous {
            info!(name = %name, "Logged out");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_name", &self.logged_name())
            .finish_non_exhaustive()
    }
}

/// Handle a submitted login form.
///
/// A blank name asks for one. Otherwise the welcome modal is shown and the
/// session is written when it is dismissed. Returns whether the name was
/// accepted.
pub fn submit_login(session: &SessionStore, modal: &ModalHost, name: &str) -> bool {
    if name.trim().is_empty() {
        modal.open(Modal::ProvideName, None);
        return false;
    }

    let session = session.clone();
    let accepted = name.to_string();
    modal.open(
        Modal::LoggedIn {
            name: name.to_string(),
        },
        Some(Box::new(move || session.login(&accepted))),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_session() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::open(storage.clone());
        (session, storage)
    }

    #[test]
    fn test_login_persists_and_logout_clears() {
        let (session, storage) = memory_session();
        assert_eq!(session.logged_name(), None);

        session.login("John Doe");
        assert_eq!(session.logged_name().as_deref(), Some("John Doe"));
        assert_eq!(
            storage.get(LOGGED_NAME_KEY).unwrap().as_deref(),
            Some("John Doe")
        );

        session.logout();
        assert_eq!(session.logged_name(), None);
        assert_eq!(storage.get(LOGGED_NAME_KEY).unwrap(), None);
    }

    #[test]
    fn test_open_reads_stored_name() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(LOGGED_NAME_KEY, "ana").unwrap();

        let session = SessionStore::open(storage);
        assert_eq!(session.logged_name().as_deref(), Some("ana"));
    }

    #[test]
    fn test_blank_login_logs_out() {
        let (session, _) = memory_session();
        session.login("ana");
        session.login("   ");
        assert_eq!(session.logged_name(), None);
    }

    #[test]
    fn test_submit_login_blank_asks_for_name() {
        let (session, _) = memory_session();
        let modal = ModalHost::new();

        assert!(!submit_login(&session, &modal, "  "));
        assert_eq!(modal.current(), Some(Modal::ProvideName));
        modal.close();
        assert_eq!(session.logged_name(), None);
    }

    #[test]
    fn test_submit_login_applies_on_close() {
        let (session, _) = memory_session();
        let modal = ModalHost::new();

        assert!(submit_login(&session, &modal, "ana"));
        assert_eq!(
            modal.current(),
            Some(Modal::LoggedIn {
                name: "ana".to_string()
            })
        );
        assert_eq!(session.logged_name(), None);

        modal.close();
        assert_eq!(session.logged_name().as_deref(), Some("ana"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get(LOGGED_NAME_KEY).unwrap(), None);

        storage.set(LOGGED_NAME_KEY, "ana").unwrap();
        storage.set("other", "value").unwrap();
        assert!(path.exists());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(LOGGED_NAME_KEY).unwrap().as_deref(), Some("ana"));

        reopened.remove(LOGGED_NAME_KEY).unwrap();
        assert_eq!(reopened.get(LOGGED_NAME_KEY).unwrap(), None);
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get(LOGGED_NAME_KEY),
            Err(StorageError::Corrupt { .. })
        ));

        // A corrupt store starts the session logged out.
        let session = SessionStore::open(Arc::new(storage));
        assert_eq!(session.logged_name(), None);
    }
}
