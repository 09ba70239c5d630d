use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{CatalogEntry, CatalogStats};

/// Schema version written into new metadata files.
pub const METADATA_VERSION: &str = "1.1.0";

/// Maximum results of a keyword search.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Number of uploads listed in the summary.
pub const RECENT_UPLOADS: usize = 5;

/// The metadata file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub stats: CatalogStats,
    pub exams: Vec<CatalogEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    METADATA_VERSION.to_string()
}

impl MetadataDocument {
    /// Empty document stamped with `now`.
    pub fn new(now: &str) -> Self {
        Self {
            version: default_version(),
            last_updated: Some(now.to_string()),
            stats: CatalogStats::default(),
            exams: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Recompute the aggregate statistics from the entries.
    pub fn refresh_stats(&mut self, now: &str) {
        let mut stats = CatalogStats::from_entries(&self.exams);
        stats.last_updated = Some(now.to_string());
        self.stats = stats;
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut CatalogEntry> {
        self.exams.iter_mut().find(|e| e.id == id)
    }
}

/// Which counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    View,
    Download,
}

impl CounterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "views",
            Self::Download => "downloads",
        }
    }
}

/// Query parameters of the server-side listing.
///
/// Empty strings are treated as unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExamQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub subject: Option<String>,
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "year_param")]
    pub year: Option<i32>,
    pub search: Option<String>,
}

/// `year=` (empty) means no year constraint.
fn year_param<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for ExamQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            subject: None,
            grade: None,
            year: None,
            search: None,
        }
    }
}

impl ExamQuery {
    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Whether `entry` passes every set constraint. Search looks at name,
    /// description and tags.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(subject) = non_empty(&self.subject) {
            if entry.subject != subject {
                return false;
            }
        }
        if let Some(grade) = non_empty(&self.grade) {
            if entry.grade.as_deref() != Some(grade) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if entry.year != Some(year) {
                return false;
            }
        }
        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            let hit = entry.name.to_lowercase().contains(&needle)
                || entry.description.to_lowercase().contains(&needle)
                || entry.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// One page of the server-side listing.
///
/// `total_pages` is `ceil(total / limit)` and is 0 for an empty result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPage {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub exams: Vec<CatalogEntry>,
}

/// Keyword search result. `count` is the number of matches before the limit
/// was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub results: Vec<CatalogEntry>,
}

/// Short form of a recent upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUpload {
    pub id: String,
    pub name: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

impl From<&CatalogEntry> for RecentUpload {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            subject: entry.subject.clone(),
            upload_date: entry.upload_date.clone(),
        }
    }
}

/// Statistics plus the newest uploads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub stats: CatalogStats,
    pub recent_uploads: Vec<RecentUpload>,
}
