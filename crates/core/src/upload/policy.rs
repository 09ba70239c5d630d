use std::path::Path;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::UploadError;
use crate::config::UploadConfig;

/// Longest sanitized stem kept in a stored file name.
const MAX_STEM_CHARS: usize = 50;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

/// The two kinds of uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Exam,
    Preview,
}

impl FileKind {
    /// Multipart field carrying this kind.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Exam => "examFile",
            Self::Preview => "previews",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "examFile" => Some(Self::Exam),
            "previews" => Some(Self::Preview),
            _ => None,
        }
    }

    /// Directory under the uploads root.
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Exam => "files",
            Self::Preview => "previews",
        }
    }
}

/// Limits and allowed types for uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size_bytes: u64,
    pub max_files: usize,
    pub max_previews: usize,
    pub exam_extensions: Vec<String>,
    pub preview_extensions: Vec<String>,
}

impl From<&UploadConfig> for UploadPolicy {
    fn from(config: &UploadConfig) -> Self {
        let lower = |exts: &[String]| -> Vec<String> {
            exts.iter().map(|e| e.to_lowercase()).collect()
        };
        Self {
            max_file_size_bytes: config.max_file_size_bytes,
            max_files: config.max_files,
            max_previews: config.max_previews,
            exam_extensions: lower(&config.exam_extensions),
            preview_extensions: lower(&config.preview_extensions),
        }
    }
}

impl UploadPolicy {
    pub fn allowed_extensions(&self, kind: FileKind) -> &[String] {
        match kind {
            FileKind::Exam => &self.exam_extensions,
            FileKind::Preview => &self.preview_extensions,
        }
    }

    /// How many files of `kind` one upload may carry.
    pub fn max_count(&self, kind: FileKind) -> usize {
        match kind {
            FileKind::Exam => 1,
            FileKind::Preview => self.max_previews,
        }
    }

    /// Largest request body a valid upload can produce.
    pub fn max_request_bytes(&self) -> usize {
        let files = self.max_file_size_bytes.saturating_mul(self.max_files as u64);
        // Room for the text fields and multipart framing.
        usize::try_from(files)
            .unwrap_or(usize::MAX)
            .saturating_add(1024 * 1024)
    }

    /// Check `file_name`'s extension against the list for `kind`.
    ///
    /// Returns the lowercased extension including the dot.
    pub fn check_extension(&self, kind: FileKind, file_name: &str) -> Result<String, UploadError> {
        let allowed = self.allowed_extensions(kind);
        match extension_of(file_name) {
            Some(ext) if allowed.contains(&ext) => Ok(ext),
            _ => Err(UploadError::FileType {
                field: kind.field().to_string(),
                allowed: allowed.to_vec(),
            }),
        }
    }
}

/// Lowercased `.ext` of a file name, if it has one.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Name a file is stored under:
/// `<sanitized stem>_<unix millis>-<random>.<ext>`.
///
/// The stem keeps ASCII letters and digits, everything else becomes `_`,
/// and is cut to 50 characters. The extension keeps its original case.
pub fn stored_file_name(original: &str, millis: i64, random: u32) -> String {
    let path = Path::new(original);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let safe: String = UNSAFE_CHARS
        .replace_all(stem, "_")
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}_{}-{}{}", safe, millis, random, ext)
}
