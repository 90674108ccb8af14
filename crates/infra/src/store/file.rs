use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::r#trait::{KeyValueStore, StoreError};

/// File-backed key/value store.
///
/// The whole store is one JSON object (`{ key: value }`) on disk. Every batch
/// rewrites the document into a sibling temp file and renames it over the
/// target file, so a crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) a store at `path`.
    ///
    /// A missing file starts empty; it is only created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    StoreError::Serialization(format!("{}: {e}", path.display()))
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened json file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_document(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.temp_path();
        let written = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(&body)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &self.path));

        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    fn set_many(&self, batch: &[(&str, String)]) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let mut next = entries.clone();
        for (key, value) in batch {
            next.insert((*key).to_string(), value.clone());
        }

        // Publish the new view only once the document is durable.
        if let Err(err) = self.write_document(&next) {
            tracing::error!("failed to persist {}: {err}", self.path.display());
            return Err(err);
        }
        *entries = next;

        tracing::debug!(path = %self.path.display(), keys = batch.len(), "committed batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_starts_empty_and_is_created_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(!path.exists());

        store.set("k", "[]".to_string()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn reopen_sees_committed_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store
                .set_many(&[("a", "[1]".to_string()), ("b", "[2]".to_string())])
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("[1]"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("[2]"));
        assert!(!reopened.temp_path().exists());
    }

    #[test]
    fn corrupt_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn failed_write_keeps_previous_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("a", "[1]".to_string()).unwrap();

        // Replace the target with a directory so the rename fails.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.set("a", "[2]".to_string()).is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("[1]"));
        assert!(!store.temp_path().exists());
    }
}
