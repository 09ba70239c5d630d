//! The metadata file: the catalog document the upload service reads and
//! rewrites, and the browsing client fetches.

mod json_store;
mod types;

pub use json_store::JsonMetadataStore;
pub use types::*;

use crate::catalog::{CatalogEntry, CatalogError, CatalogStats, SubjectCount};

/// Trait for metadata storage backends.
///
/// Every mutating call recomputes the aggregate statistics and persists the
/// document before returning.
pub trait MetadataStore: Send + Sync {
    /// Server-side filtered, paginated listing.
    fn query(&self, query: &ExamQuery) -> Result<ExamPage, CatalogError>;

    /// Get an entry and count one view.
    fn get_and_count_view(&self, id: &str) -> Result<CatalogEntry, CatalogError>;

    /// Bump one counter; returns the new value.
    fn increment(&self, id: &str, field: CounterField) -> Result<u64, CatalogError>;

    /// Add an entry at the front of the catalog.
    fn insert(&self, entry: CatalogEntry) -> Result<CatalogStats, CatalogError>;

    /// Keyword search over name, description, tags and knowledge points.
    fn search(&self, keyword: &str, limit: usize) -> Result<SearchResults, CatalogError>;

    /// Subjects in order of first appearance, with entry counts.
    fn subjects(&self) -> Result<Vec<SubjectCount>, CatalogError>;

    /// Stored statistics plus the most recent uploads.
    fn summary(&self) -> Result<StatsSummary, CatalogError>;

    /// Number of entries.
    fn count(&self) -> Result<usize, CatalogError>;
}
