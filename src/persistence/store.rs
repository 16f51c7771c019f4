//! Key -> string blob stores

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Durable key/value storage for serialized record sets.
///
/// Writes may be buffered until [`RecordStore::flush`].
pub trait RecordStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete_key(&mut self, key: &str);
    fn has_key(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// In-process store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Single JSON file holding every key, written on flush.
///
/// Native counterpart of browser LocalStorage.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
    dirty: bool,
}

impl FileStore {
    /// Open the store at `path`. A missing, unreadable or corrupt file opens
    /// empty; only a missing file is expected.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HashMap<String, String>>(&json) {
                Ok(entries) => {
                    log::info!("Opened store {} ({} keys)", path.display(), entries.len());
                    entries
                }
                Err(e) => {
                    log::warn!("Store {} is corrupt, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No store at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                log::warn!("Cannot read store {}, starting empty: {}", path.display(), e);
                HashMap::new()
            }
        };

        Self {
            path,
            entries,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl RecordStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.dirty = true;
        Ok(())
    }

    fn delete_key(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        // Write to a sibling then rename so a crash never leaves half a file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        self.dirty = false;
        log::debug!("Flushed store {}", self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// `None` when the page has no LocalStorage (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl RecordStore for LocalStorageStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Platform {
                detail: format!("{:?}", e),
            })
    }

    fn delete_key(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        // LocalStorage writes are synchronous
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(!store.has_key("a"));
        store.set_string("a", "1").unwrap();
        assert_eq!(store.get_string("a").as_deref(), Some("1"));
        store.delete_key("a");
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_persists_on_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = FileStore::open(&path);
        store.set_string("SavedBoxes", "{\"boxes\":[]}").unwrap();
        assert!(!path.exists());
        store.flush().unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.get_string("SavedBoxes").as_deref(),
            Some("{\"boxes\":[]}")
        );
    }

    #[test]
    fn test_file_store_corrupt_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn test_file_store_non_utf8_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.keys().count(), 0);
        assert_eq!(store.path(), path.as_path());
        // Nothing written yet, the unreadable file is left alone
        assert_eq!(fs::read(&path).unwrap(), vec![0xff, 0xfe, 0x00, 0x80]);
    }

    #[test]
    fn test_file_store_delete_is_flushed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = FileStore::open(&path);
        store.set_string("k", "v").unwrap();
        store.flush().unwrap();
        store.delete_key("k");
        store.flush().unwrap();

        assert!(!FileStore::open(&path).has_key("k"));
    }
}
