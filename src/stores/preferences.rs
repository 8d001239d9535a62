//! Preference storage seam
//!
//! Preferences are untyped string pairs. Reads always succeed; anything
//! missing or malformed is resolved to defaults by the reader.

use std::path::{Path, PathBuf};

use futures::stream::BoxStream;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::warn;

use crate::errors::PreferenceError;
use crate::models::Preferences;

/// Key/value preference storage with change notification
pub trait PreferenceStore: Send + Sync + 'static {
    /// Current preferences
    fn read(&self) -> Preferences;

    /// Emits the full preferences on subscribe and after every write
    fn changes(&self) -> BoxStream<'static, Preferences>;

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    fn remove(&self, key: &str) -> Result<(), PreferenceError>;
}

/// Preferences held in memory only
#[derive(Debug)]
pub struct MemoryPreferenceStore {
    tx: watch::Sender<Preferences>,
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl MemoryPreferenceStore {
    pub fn new(initial: Preferences) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Set several keys in one notification
    pub fn set_many<'a>(&self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.tx.send_modify(|prefs| {
            for (key, value) in pairs {
                prefs.set(key, value);
            }
        });
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self) -> Preferences {
        self.tx.borrow().clone()
    }

    fn changes(&self) -> BoxStream<'static, Preferences> {
        WatchStream::new(self.tx.subscribe()).boxed()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.tx.send_modify(|prefs| prefs.set(key, value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        self.tx.send_modify(|prefs| {
            prefs.remove(key);
        });
        Ok(())
    }
}

/// Preferences persisted as a JSON object in a file
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    memory: MemoryPreferenceStore,
    /// Serializes read-modify-persist-notify so disk and memory agree
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    /// Open the store; an unreadable or corrupt file starts from empty preferences
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let initial = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable preferences in {}: {}", path.display(), e);
                Preferences::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                warn!("Failed to read preferences from {}: {}", path.display(), e);
                Preferences::default()
            }
        };

        Self {
            path,
            memory: MemoryPreferenceStore::new(initial),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, prefs: &Preferences) -> Result<(), PreferenceError> {
        let content = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, content).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn read(&self) -> Preferences {
        self.memory.read()
    }

    fn changes(&self) -> BoxStream<'static, Preferences> {
        self.memory.changes()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _write = self.write_lock.lock();
        let mut prefs = self.read();
        prefs.set(key, value);
        // only notify once the change is on disk
        self.persist(&prefs)?;
        self.memory.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let _write = self.write_lock.lock();
        let mut prefs = self.read();
        prefs.remove(key);
        self.persist(&prefs)?;
        self.memory.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::{SONG_SORT_DESCENDING, SONG_SORT_TYPE};

    #[tokio::test]
    async fn test_memory_store_emits_every_write() {
        let store = MemoryPreferenceStore::default();
        let mut changes = store.changes();
        assert_eq!(changes.next().await.unwrap(), Preferences::default());

        store.set(SONG_SORT_TYPE, "NAME").unwrap();
        let prefs = changes.next().await.unwrap();
        assert_eq!(prefs.get(SONG_SORT_TYPE), Some("NAME"));

        store.set_many([(SONG_SORT_TYPE, "ARTIST"), (SONG_SORT_DESCENDING, "false")]);
        let prefs = changes.next().await.unwrap();
        assert_eq!(prefs.get(SONG_SORT_TYPE), Some("ARTIST"));
        assert_eq!(prefs.get(SONG_SORT_DESCENDING), Some("false"));
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let store = JsonPreferenceStore::open(&path);
        store.set(SONG_SORT_TYPE, "PLAY_TIME").unwrap();
        store.set(SONG_SORT_DESCENDING, "false").unwrap();
        store.remove(SONG_SORT_DESCENDING).unwrap();

        let reopened = JsonPreferenceStore::open(&path);
        assert_eq!(reopened.read().get(SONG_SORT_TYPE), Some("PLAY_TIME"));
        assert_eq!(reopened.read().get(SONG_SORT_DESCENDING), None);
    }

    #[test]
    fn test_json_store_concurrent_writers_agree_with_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        let store = std::sync::Arc::new(JsonPreferenceStore::open(&path));

        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..20 {
                        store.set(&format!("key{writer}_{i}"), "true").unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let on_disk = JsonPreferenceStore::open(&path).read();
        assert_eq!(store.read().iter().count(), 160);
        assert_eq!(on_disk, store.read());
    }

    #[test]
    fn test_json_store_tolerates_corrupt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonPreferenceStore::open(&path);
        assert_eq!(store.read(), Preferences::default());
    }

    #[test]
    fn test_json_store_reports_write_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        // a directory cannot be written as a file
        let store = JsonPreferenceStore::open(dir.path());
        let err = store.set(SONG_SORT_TYPE, "NAME").unwrap_err();
        assert!(matches!(err, PreferenceError::Write { .. }));
        assert_eq!(store.read().get(SONG_SORT_TYPE), None);
    }
}
