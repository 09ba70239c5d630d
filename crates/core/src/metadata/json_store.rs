use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use super::{
    CounterField, ExamPage, ExamQuery, MetadataDocument, MetadataStore, RecentUpload,
    SearchResults, StatsSummary, RECENT_UPLOADS,
};
use crate::catalog::{CatalogEntry, CatalogError, CatalogStats, SubjectCount};
use crate::metrics;

/// Metadata store backed by a single pretty-printed JSON file.
///
/// Every call re-reads the file, so edits made behind the server's back are
/// picked up. Calls are serialized by a process-local lock; writes go
/// through a temporary sibling file and a rename.
#[derive(Debug)]
pub struct JsonMetadataStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonMetadataStore {
    /// Open the store, creating an empty document if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        let doc = {
            let _guard = store.guard()?;
            store.read()?
        };
        info!(path = %store.path.display(), exams = doc.exams.len(), "Metadata store opened");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, CatalogError> {
        self.lock
            .lock()
            .map_err(|_| CatalogError::Internal("metadata lock poisoned".to_string()))
    }

    fn read(&self) -> Result<MetadataDocument, CatalogError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CatalogError::DataFormat(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Metadata file missing, creating it");
                let mut doc = MetadataDocument::new(&now());
                self.write(&mut doc)?;
                Ok(doc)
            }
            Err(e) => Err(CatalogError::Io(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Refresh the statistics and replace the file.
    fn write(&self, doc: &mut MetadataDocument) -> Result<(), CatalogError> {
        let now = now();
        doc.refresh_stats(&now);
        doc.last_updated = Some(now);

        let result = self.write_file(doc);
        let label = if result.is_ok() { "success" } else { "failed" };
        metrics::METADATA_WRITES.with_label_values(&[label]).inc();
        if let Err(e) = &result {
            warn!(path = %self.path.display(), error = %e, "Failed to write metadata");
        }
        result
    }

    fn write_file(&self, doc: &MetadataDocument) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Io(format!("failed to create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| CatalogError::Internal(format!("failed to encode metadata: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| CatalogError::Io(format!("failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            CatalogError::Io(format!("failed to replace {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), exams = doc.exams.len(), "Metadata written");
        Ok(())
    }

    fn bump(&self, id: &str, field: CounterField) -> Result<CatalogEntry, CatalogError> {
        let _guard = self.guard()?;
        let mut doc = self.read()?;
        let entry = doc
            .find_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        match field {
            CounterField::View => entry.views += 1,
            CounterField::Download => entry.downloads += 1,
        }
        let updated = entry.clone();
        self.write(&mut doc)?;

        metrics::COUNTER_INCREMENTS
            .with_label_values(&[field.as_str()])
            .inc();
        Ok(updated)
    }
}

impl MetadataStore for JsonMetadataStore {
    fn query(&self, query: &ExamQuery) -> Result<ExamPage, CatalogError> {
        let doc = {
            let _guard = self.guard()?;
            self.read()?
        };

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let matching: Vec<CatalogEntry> = doc
            .exams
            .into_iter()
            .filter(|e| query.matches(e))
            .collect();

        let total = matching.len();
        let start = (page - 1).saturating_mul(limit).min(total);
        let exams = matching.into_iter().skip(start).take(limit).collect();

        Ok(ExamPage {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
            exams,
        })
    }

    fn get_and_count_view(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
        self.bump(id, CounterField::View)
    }

    fn increment(&self, id: &str, field: CounterField) -> Result<u64, CatalogError> {
        let entry = self.bump(id, field)?;
        Ok(match field {
            CounterField::View => entry.views,
            CounterField::Download => entry.downloads,
        })
    }

    fn insert(&self, entry: CatalogEntry) -> Result<CatalogStats, CatalogError> {
        let _guard = self.guard()?;
        let mut doc = self.read()?;
        info!(id = %entry.id, name = %entry.name, "Adding catalog entry");
        doc.exams.insert(0, entry);
        self.write(&mut doc)?;
        Ok(doc.stats)
    }

    fn search(&self, keyword: &str, limit: usize) -> Result<SearchResults, CatalogError> {
        let doc = {
            let _guard = self.guard()?;
            self.read()?
        };

        let needle = keyword.to_lowercase();
        let contains = |s: &str| s.to_lowercase().contains(&needle);
        let matching: Vec<CatalogEntry> = doc
            .exams
            .into_iter()
            .filter(|e| {
                contains(e.name.as_str())
                    || contains(e.description.as_str())
                    || e.tags.iter().any(|t| contains(t.as_str()))
                    || e.knowledge_points.iter().any(|p| contains(p.as_str()))
            })
            .collect();

        Ok(SearchResults {
            count: matching.len(),
            results: matching.into_iter().take(limit).collect(),
        })
    }

    fn subjects(&self) -> Result<Vec<SubjectCount>, CatalogError> {
        let doc = {
            let _guard = self.guard()?;
            self.read()?
        };

        let mut subjects: Vec<SubjectCount> = Vec::new();
        for entry in doc.exams.iter().filter(|e| !e.subject.is_empty()) {
            match subjects.iter_mut().find(|s| s.name == entry.subject) {
                Some(existing) => existing.count += 1,
                None => subjects.push(SubjectCount {
                    name: entry.subject.clone(),
                    count: 1,
                }),
            }
        }
        Ok(subjects)
    }

    fn summary(&self) -> Result<StatsSummary, CatalogError> {
        let doc = {
            let _guard = self.guard()?;
            self.read()?
        };

        Ok(StatsSummary {
            recent_uploads: doc
                .exams
                .iter()
                .take(RECENT_UPLOADS)
                .map(RecentUpload::from)
                .collect(),
            stats: doc.stats,
        })
    }

    fn count(&self) -> Result<usize, CatalogError> {
        let _guard = self.guard()?;
        Ok(self.read()?.exams.len())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::EntryBuilder;
    use tempfile::TempDir;

    fn store_with(entries: Vec<CatalogEntry>) -> (TempDir, JsonMetadataStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonMetadataStore::open(dir.path().join("metadata.json")).unwrap();
        for entry in entries.into_iter().rev() {
            store.insert(entry).unwrap();
        }
        (dir, store)
    }

    fn on_disk(store: &JsonMetadataStore) -> serde_json::Value {
        serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_open_creates_default_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site").join("metadata.json");
        let store = JsonMetadataStore::open(&path).unwrap();

        assert!(path.exists());
        let doc = on_disk(&store);
        assert_eq!(doc["version"], "1.1.0");
        assert_eq!(doc["exams"], serde_json::json!([]));
        assert_eq!(doc["stats"]["totalExams"], 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_file_is_data_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonMetadataStore::open(&path).unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_insert_prepends_and_updates_stats() {
        let (_dir, store) = store_with(vec![EntryBuilder::new("old").subject("物理").build()]);
        let stats = store
            .insert(EntryBuilder::new("new").subject("数学").views(3).build())
            .unwrap();

        assert_eq!(stats.total_exams, 2);
        assert_eq!(stats.total_views, 3);
        assert_eq!(stats.subjects["数学"], 1);

        let doc = on_disk(&store);
        assert_eq!(doc["exams"][0]["id"], "new");
        assert_eq!(doc["exams"][1]["id"], "old");
        assert_eq!(doc["stats"]["totalExams"], 2);
        assert!(doc["lastUpdated"].is_string());
    }

    #[test]
    fn test_query_filters_and_paginates() {
        let entries = (0..25)
            .map(|i| {
                EntryBuilder::new(&format!("e{}", i))
                    .subject(if i % 2 == 0 { "数学" } else { "物理" })
                    .build()
            })
            .collect();
        let (_dir, store) = store_with(entries);

        let page = store.query(&ExamQuery::default()).unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.exams.len(), 20);
        assert_eq!(page.exams[0].id, "e0");

        let page = store.query(&ExamQuery::default().with_page(2, 20)).unwrap();
        assert_eq!(page.exams.len(), 5);

        let page = store
            .query(&ExamQuery::default().with_subject("数学").with_page(1, 5))
            .unwrap();
        assert_eq!(page.total, 13);
        assert_eq!(page.total_pages, 3);
        assert!(page.exams.iter().all(|e| e.subject == "数学"));

        let page = store.query(&ExamQuery::default().with_page(9, 20)).unwrap();
        assert!(page.exams.is_empty());
        assert_eq!(page.page, 9);
    }

    #[test]
    fn test_query_empty_catalog_has_zero_pages() {
        let (_dir, store) = store_with(vec![]);
        let page = store.query(&ExamQuery::default()).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_counters() {
        let (_dir, store) = store_with(vec![EntryBuilder::new("a").views(1).downloads(7).build()]);

        let entry = store.get_and_count_view("a").unwrap();
        assert_eq!(entry.views, 2);
        assert_eq!(store.increment("a", CounterField::View).unwrap(), 3);
        assert_eq!(store.increment("a", CounterField::Download).unwrap(), 8);

        let doc = on_disk(&store);
        assert_eq!(doc["exams"][0]["views"], 3);
        assert_eq!(doc["stats"]["totalDownloads"], 8);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let (_dir, store) = store_with(vec![]);
        assert!(matches!(
            store.get_and_count_view("missing"),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            store.increment("missing", CounterField::Download),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_search_includes_knowledge_points_and_limits() {
        let mut entries: Vec<CatalogEntry> = (0..60)
            .map(|i| EntryBuilder::new(&format!("f{}", i)).name("函数专项").build())
            .collect();
        entries.push(
            EntryBuilder::new("kp")
                .name("综合卷")
                .knowledge_points(&["Derivatives"])
                .build(),
        );
        let (_dir, store) = store_with(entries);

        let found = store.search("函数", 50).unwrap();
        assert_eq!(found.count, 60);
        assert_eq!(found.results.len(), 50);

        let found = store.search("derivative", 50).unwrap();
        assert_eq!(found.count, 1);
        assert_eq!(found.results[0].id, "kp");
    }

    #[test]
    fn test_subjects_in_first_appearance_order() {
        let entries = vec![
            EntryBuilder::new("a").subject("物理").build(),
            EntryBuilder::new("b").subject("数学").build(),
            EntryBuilder::new("c").subject("物理").build(),
            EntryBuilder::new("d").build(),
        ];
        let (_dir, store) = store_with(entries);

        let subjects = store.subjects().unwrap();
        assert_eq!(
            subjects,
            vec![
                SubjectCount { name: "物理".into(), count: 2 },
                SubjectCount { name: "数学".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_summary_lists_five_most_recent() {
        let entries = (0..7)
            .map(|i| {
                EntryBuilder::new(&format!("e{}", i))
                    .upload_date("2024-03-01")
                    .build()
            })
            .collect();
        let (_dir, store) = store_with(entries);

        let summary = store.summary().unwrap();
        assert_eq!(summary.stats.total_exams, 7);
        assert_eq!(summary.recent_uploads.len(), 5);
        assert_eq!(summary.recent_uploads[0].id, "e0");
        assert_eq!(summary.recent_uploads[0].upload_date.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"version": "1.1.0", "owner": "school", "exams": [{"id": "a", "name": "A", "rating": 5}]}"#,
        )
        .unwrap();

        let store = JsonMetadataStore::open(&path).unwrap();
        store.increment("a", CounterField::View).unwrap();

        let doc = on_disk(&store);
        assert_eq!(doc["owner"], "school");
        assert_eq!(doc["exams"][0]["rating"], 5);
        assert_eq!(doc["exams"][0]["views"], 1);
    }

    #[test]
    fn test_null_fields_on_disk_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"version": "1.1.0", "exams": [{"id": "a", "name": "A", "tags": null, "description": null, "subject": null}]}"#,
        )
        .unwrap();

        let store = JsonMetadataStore::open(&path).unwrap();
        let page = store.query(&ExamQuery::default().with_search("a")).unwrap();
        assert_eq!(page.total, 1);
        assert!(store.subjects().unwrap().is_empty());
        assert_eq!(store.increment("a", CounterField::Download).unwrap(), 1);

        let doc = on_disk(&store);
        assert_eq!(doc["exams"][0]["tags"], serde_json::json!([]));
    }
}
