use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::KeyValueStorage;

/// The user's favorited entry ids, written through to storage on every
/// mutation.
///
/// Ids without a matching catalog entry are kept as they are; they simply
/// never match anything.
pub struct FavoritesSet {
    ids: BTreeSet<String>,
    key: String,
    storage: Box<dyn KeyValueStorage>,
}

impl FavoritesSet {
    /// Load the set stored under `key`. Absent, unreadable or corrupt data
    /// yields an empty set.
    pub fn load(storage: Box<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let ids = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!(key = %key, error = %e, "Ignoring corrupt favorites data");
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load favorites, starting empty");
                BTreeSet::new()
            }
        };

        debug!(key = %key, count = ids.len(), "Favorites loaded");
        Self { ids, key, storage }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership of `id` and persist. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_member = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.save();
        now_member
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn save(&self) {
        let ids: Vec<&str> = self.iter().collect();
        let raw = match serde_json::to_string(&ids) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to encode favorites");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &raw) {
            warn!(error = %e, "Failed to save favorites");
        }
    }
}

impl std::fmt::Debug for FavoritesSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesSet")
            .field("key", &self.key)
            .field("ids", &self.ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{MemoryStorage, StorageError};
    use std::sync::Arc;

    const KEY: &str = "exam_favorites_v5";

    /// Storage that shares its backing map with the test.
    struct Shared(Arc<MemoryStorage>);

    impl KeyValueStorage for Shared {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value)
        }
    }

    struct Broken;

    impl KeyValueStorage for Broken {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                key: key.to_string(),
                reason: "quota".to_string(),
            })
        }
        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota".to_string(),
            })
        }
    }

    #[test]
    fn test_load_existing_ids() {
        let storage = MemoryStorage::with_value(KEY, r#"["a","b"]"#);
        let set = FavoritesSet::load(Box::new(storage), KEY);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let storage = MemoryStorage::with_value(KEY, "{oops");
        let set = FavoritesSet::load(Box::new(storage), KEY);
        assert!(set.is_empty());
    }

    #[test]
    fn test_broken_storage_degrades_silently() {
        let mut set = FavoritesSet::load(Box::new(Broken), KEY);
        assert!(set.is_empty());
        assert!(set.toggle("a"));
        assert!(set.contains("a"));
    }

    #[test]
    fn test_toggle_twice_restores_membership_and_persisted_value() {
        let backing = Arc::new(MemoryStorage::with_value(KEY, r#"["b"]"#));
        let mut set = FavoritesSet::load(Box::new(Shared(Arc::clone(&backing))), KEY);

        assert!(set.toggle("a"));
        assert_eq!(backing.get(KEY).unwrap().as_deref(), Some(r#"["a","b"]"#));

        assert!(!set.toggle("a"));
        assert!(!set.contains("a"));
        assert_eq!(backing.get(KEY).unwrap().as_deref(), Some(r#"["b"]"#));
    }
}
