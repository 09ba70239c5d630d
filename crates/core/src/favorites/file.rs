use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStorage, StorageError};

/// Key-value storage backed by a single JSON object file.
///
/// Every `set` rewrites the whole file through a temporary sibling and a
/// rename, so a crash leaves either the old or the new content.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, String> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.to_string()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(values).map_err(|e| e.to_string())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| e.to_string())?;
        fs::rename(&tmp, &self.path).map_err(|e| e.to_string())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_err = |reason: String| StorageError::Read {
            key: key.to_string(),
            reason,
        };
        let _guard = self
            .lock
            .lock()
            .map_err(|_| read_err("storage lock poisoned".to_string()))?;
        let values = self.read_all().map_err(read_err)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |reason: String| StorageError::Write {
            key: key.to_string(),
            reason,
        };
        let _guard = self
            .lock
            .lock()
            .map_err(|_| write_err("storage lock poisoned".to_string()))?;
        let mut values = self.read_all().map_err(write_err)?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("storage.json"));
        assert_eq!(storage.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        JsonFileStorage::new(&path).set("a", "1").unwrap();
        JsonFileStorage::new(&path).set("b", "2").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(
            storage.get("a"),
            Err(StorageError::Read { .. })
        ));
    }
}
