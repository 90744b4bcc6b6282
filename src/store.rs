//! Local persistence for favorites
//!
//! Favorites live as one JSON array under a single key of a [`KeyValueStore`].
//! Every mutation rewrites the whole array, which is fine for the handful of
//! shows a user marks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::Show;

const FAVORITES_KEY: &str = "favorites";
const ALERT_SHOWN_KEY: &str = "alert_shown";

/// Persistence error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Byte-oriented key-value persistence
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

// =============================================================================
// File Store
// =============================================================================

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory (~/.local/share/tvshelf on Linux)
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("tvshelf"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// =============================================================================
// Favorites Store
// =============================================================================

/// Set of favorite shows keyed by id, in insertion order.
///
/// Create one per process and share it (`Arc<FavoritesStore>`); the internal
/// lock only serializes callers going through the same instance.
pub struct FavoritesStore {
    backend: Box<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").finish_non_exhaustive()
    }
}

impl FavoritesStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            lock: Mutex::new(()),
        }
    }

    /// Favorites kept in memory only
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Undecodable data is treated as an empty list and replaced on the next write
    fn load(&self) -> Result<Vec<Show>, StoreError> {
        let Some(bytes) = self.backend.read(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(shows) => Ok(shows),
            Err(e) => {
                warn!(error = %e, "discarding unreadable favorites");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, shows: &[Show]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(shows)?;
        self.backend.write(FAVORITES_KEY, &bytes)
    }

    /// Add a show; returns false if a show with that id was already present
    pub fn add(&self, show: &Show) -> Result<bool, StoreError> {
        let _guard = self.guard();
        let mut shows = self.load()?;
        if shows.iter().any(|s| s.id == show.id) {
            return Ok(false);
        }
        shows.push(show.clone());
        self.save(&shows)?;
        info!(id = show.id, name = %show.name, "added favorite");
        Ok(true)
    }

    /// Remove by id; returns whether anything was removed
    pub fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let _guard = self.guard();
        let mut shows = self.load()?;
        let before = shows.len();
        shows.retain(|s| s.id != id);
        if shows.len() == before {
            return Ok(false);
        }
        self.save(&shows)?;
        info!(id, "removed favorite");
        Ok(true)
    }

    /// Favorites in persisted order
    pub fn list(&self) -> Result<Vec<Show>, StoreError> {
        let _guard = self.guard();
        self.load()
    }

    pub fn contains(&self, id: u64) -> Result<bool, StoreError> {
        let _guard = self.guard();
        Ok(self.load()?.iter().any(|s| s.id == id))
    }

    /// Whether the first-visit hint on the favorites screen was already shown
    pub fn alert_shown(&self) -> Result<bool, StoreError> {
        Ok(self
            .backend
            .read(ALERT_SHOWN_KEY)?
            .and_then(|bytes| serde_json::from_slice::<bool>(&bytes).ok())
            .unwrap_or(false))
    }

    pub fn mark_alert_shown(&self) -> Result<(), StoreError> {
        self.backend.write(ALERT_SHOWN_KEY, &serde_json::to_vec(&true)?)
    }
}
