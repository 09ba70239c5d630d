//! Types for the exam catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One downloadable exam document and its metadata.
///
/// Entries are immutable once loaded, apart from the counters. Fields the
/// catalog does not know about are kept in `extra` so a read-modify-write of
/// the metadata file never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// Open enumeration, e.g. "简单" / "中等" / "困难".
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Origin label of the document.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview_images: Vec<String>,
    /// URL or site-relative path of the document.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_url: String,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_formatted: Option<String>,
    /// Upper-case format label ("PDF", "DOCX").
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_format: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub knowledge_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_answer: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer_included: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_original: bool,
    /// Recommended time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CatalogEntry {
    /// Minimal entry; every optional attribute left empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            subject: String::new(),
            difficulty: String::new(),
            grade: None,
            source: String::new(),
            views: 0,
            downloads: 0,
            tags: Vec::new(),
            preview_images: Vec::new(),
            file_url: String::new(),
            file_size: 0,
            file_size_formatted: None,
            file_format: String::new(),
            knowledge_points: Vec::new(),
            year: None,
            author: None,
            page_count: None,
            question_count: None,
            total_score: None,
            has_answer: false,
            answer_included: false,
            is_original: false,
            recommended_time: None,
            region: None,
            remarks: None,
            upload_date: None,
            upload_timestamp: None,
            last_modified: None,
            extra: Map::new(),
        }
    }

    /// Whether the entry points at a file that can actually be fetched.
    pub fn has_download(&self) -> bool {
        let url = self.file_url.trim();
        !url.is_empty() && url != "#"
    }

    /// Suggested file name for a download: `<name>.<format>`.
    pub fn download_file_name(&self) -> String {
        if self.file_format.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.file_format)
        }
    }
}

/// The catalog document as served to the browsing client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    pub exams: Vec<CatalogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Aggregate statistics kept alongside the catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    #[serde(default)]
    pub total_exams: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Entry count per subject.
    #[serde(default)]
    pub subjects: BTreeMap<String, u64>,
}

impl CatalogStats {
    /// Derive statistics from a set of entries. Entries with an empty subject
    /// are counted in the totals but not per subject.
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let mut subjects = BTreeMap::new();
        for entry in entries.iter().filter(|e| !e.subject.is_empty()) {
            *subjects.entry(entry.subject.clone()).or_insert(0) += 1;
        }

        Self {
            total_exams: entries.len() as u64,
            total_views: entries
                .iter()
                .fold(0u64, |acc, e| acc.saturating_add(e.views)),
            total_downloads: entries
                .iter()
                .fold(0u64, |acc, e| acc.saturating_add(e.downloads)),
            last_updated: None,
            subjects,
        }
    }
}

/// A subject and how many entries carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCount {
    pub name: String,
    pub count: u64,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not a well-formed payload.
    #[error("Malformed catalog data: {0}")]
    DataFormat(String),

    /// The catalog could not be retrieved.
    #[error("Failed to fetch catalog: {0}")]
    Fetch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
