//! Favorite and recently used commands, and the storage port they sync through.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::model::CommandDefinition;
use crate::paths::{library_key_path, FAVORITES_KEY, RECENT_KEY};
use crate::storage::{read_json, write_json, StorageError};

/// How many distinct commands the recent list keeps.
pub const RECENT_LIMIT: usize = 10;

/// Commands the user starred, in the order they were starred. Unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct FavoriteSet(Vec<Arc<CommandDefinition>>);

impl FavoriteSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.name == name)
    }

    /// Remove the command if present, append it otherwise. Returns whether it
    /// is a favorite afterwards.
    pub fn toggle(&mut self, command: Arc<CommandDefinition>) -> bool {
        if self.contains(&command.name) {
            self.0.retain(|c| c.name != command.name);
            false
        } else {
            self.0.push(command);
            true
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<CommandDefinition>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Recently selected commands, newest first, at most [`RECENT_LIMIT`].
///
/// Re-selecting a command that is already listed leaves the list as it is;
/// it is not moved back to the front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct RecentList(Vec<Arc<CommandDefinition>>);

impl RecentList {
    /// Returns true when the list changed.
    pub fn record(&mut self, command: Arc<CommandDefinition>) -> bool {
        if self.contains(&command.name) {
            return false;
        }
        self.0.insert(0, command);
        self.0.truncate(RECENT_LIMIT);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<CommandDefinition>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Favorites and recents together; what a [`LibraryStore`] loads and saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CommandLibrary {
    pub favorites: FavoriteSet,
    pub recent: RecentList,
}

/// Durable home of the command library. Loaded once per session and written
/// through on every change.
pub trait LibraryStore: Send + Sync {
    /// Never fails: unreadable state yields empty collections.
    fn load(&self) -> CommandLibrary;
    /// Overwrites whatever was stored before.
    fn save(&self, library: &CommandLibrary) -> Result<(), StorageError>;
}

/// One JSON file per storage key under a data directory:
/// `favorites.json` and `recentCommands.json`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load_key<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = library_key_path(&self.dir, key);
        if !path.exists() {
            return T::default();
        }
        match read_json(&path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable stored list");
                T::default()
            }
        }
    }
}

impl LibraryStore for JsonFileStore {
    fn load(&self) -> CommandLibrary {
        let library = CommandLibrary {
            favorites: self.load_key(FAVORITES_KEY),
            recent: self.load_key(RECENT_KEY),
        };
        tracing::debug!(
            favorites = library.favorites.len(),
            recent = library.recent.len(),
            "loaded command library"
        );
        library
    }

    fn save(&self, library: &CommandLibrary) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        write_json(&library_key_path(&self.dir, FAVORITES_KEY), &library.favorites)?;
        write_json(&library_key_path(&self.dir, RECENT_KEY), &library.recent)?;
        Ok(())
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<CommandLibrary>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn with(library: CommandLibrary) -> Self {
        Self {
            saved: Mutex::new(library),
            saves: Mutex::new(0),
        }
    }

    pub fn saved(&self) -> CommandLibrary {
        self.saved.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl LibraryStore for MemoryStore {
    fn load(&self) -> CommandLibrary {
        self.saved.lock().clone()
    }

    fn save(&self, library: &CommandLibrary) -> Result<(), StorageError> {
        *self.saved.lock() = library.clone();
        *self.saves.lock() += 1;
        Ok(())
    }
}
