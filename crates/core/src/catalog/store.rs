//! In-memory catalog plus the user's favorites.

use std::collections::HashMap;

use tracing::info;

use super::{parse_payload, CatalogEntry, CatalogError};
use crate::favorites::FavoritesSet;

/// Holds the loaded entries and the favorites set.
///
/// Queries are pure; the only mutations are [`load`](Self::load),
/// [`toggle_favorite`](Self::toggle_favorite) and the local download counter.
#[derive(Debug)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    favorites: FavoritesSet,
}

impl CatalogStore {
    pub fn new(favorites: FavoritesSet) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            favorites,
        }
    }

    /// Replace the whole collection. On duplicate ids the first entry wins
    /// lookups; both stay in the collection.
    pub fn load(&mut self, entries: Vec<CatalogEntry>) {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            index.entry(entry.id.clone()).or_insert(pos);
        }
        info!(count = entries.len(), "Catalog loaded");
        self.entries = entries;
        self.index = index;
    }

    /// Parse a raw catalog document and load it.
    pub fn load_json(&mut self, bytes: &[u8]) -> Result<usize, CatalogError> {
        let payload = parse_payload(bytes)?;
        let count = payload.exams.len();
        self.load(payload.exams);
        Ok(count)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Flip the favorite flag of a loaded entry and persist the set.
    ///
    /// Unknown ids leave the set untouched; the current membership is
    /// returned either way.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return self.favorites.contains(id);
        }
        self.favorites.toggle(id)
    }

    /// Optimistic local bump of the download counter. Persisting the count
    /// is the upload service's job.
    pub fn record_download(&mut self, id: &str) -> Option<u64> {
        let pos = *self.index.get(id)?;
        let entry = &mut self.entries[pos];
        entry.downloads += 1;
        Some(entry.downloads)
    }
}
