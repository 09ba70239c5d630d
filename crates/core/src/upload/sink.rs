use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::policy::{stored_file_name, FileKind, UploadPolicy};
use super::UploadError;
use crate::metrics;

/// A file fully written to the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub kind: FileKind,
    pub original_name: String,
    pub stored_name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl StoredFile {
    /// Site-relative reference used in the catalog.
    pub fn public_url(&self) -> String {
        format!("./uploads/{}/{}", self.kind.dir(), self.stored_name)
    }

    /// Upper-case extension of the original name, without the dot.
    pub fn format_label(&self) -> String {
        Path::new(&self.original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_uppercase)
            .unwrap_or_default()
    }
}

/// A file being streamed to disk.
#[derive(Debug)]
pub struct PendingFile {
    kind: FileKind,
    original_name: String,
    stored_name: String,
    path: PathBuf,
    file: File,
    written: u64,
    limit: u64,
}

impl PendingFile {
    /// Append a chunk. Going over the size limit removes the partial file.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        self.written += chunk.len() as u64;
        if self.written > self.limit {
            debug!(path = %self.path.display(), limit = self.limit, "Upload over size limit");
            if let Err(e) = fs::remove_file(&self.path).await {
                warn!(path = %self.path.display(), error = %e, "Failed to remove partial file");
            }
            return Err(UploadError::FileTooLarge {
                field: self.kind.field().to_string(),
                limit: self.limit,
            });
        }
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| UploadError::io(&self.path, e))
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and close the file.
    pub async fn finish(mut self) -> Result<StoredFile, UploadError> {
        self.file
            .flush()
            .await
            .map_err(|e| UploadError::io(&self.path, e))?;
        Ok(StoredFile {
            kind: self.kind,
            original_name: self.original_name,
            stored_name: self.stored_name,
            path: self.path,
            size: self.written,
        })
    }
}

/// The files of one upload request.
///
/// Every file created through the session is tracked, so a failed upload
/// can remove all of them with [`cleanup`](Self::cleanup).
#[derive(Debug)]
pub struct UploadSession {
    policy: UploadPolicy,
    uploads_dir: PathBuf,
    created: Vec<PathBuf>,
    stored: Vec<StoredFile>,
}

impl UploadSession {
    pub fn new(policy: UploadPolicy, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            uploads_dir: uploads_dir.into(),
            created: Vec::new(),
            stored: Vec::new(),
        }
    }

    /// Admit a file field and create its target file.
    ///
    /// Field name, file counts and extension are all checked before
    /// anything is written.
    pub async fn open_file(
        &mut self,
        field: &str,
        file_name: &str,
    ) -> Result<PendingFile, UploadError> {
        let kind = FileKind::from_field(field).ok_or_else(|| UploadError::UnexpectedField {
            field: field.to_string(),
        })?;

        if self.created.len() >= self.policy.max_files {
            return Err(UploadError::TooManyFiles {
                limit: self.policy.max_files,
            });
        }
        let max_of_kind = self.policy.max_count(kind);
        if self.stored.iter().filter(|f| f.kind == kind).count() >= max_of_kind {
            return Err(UploadError::TooManyFiles { limit: max_of_kind });
        }

        self.policy.check_extension(kind, file_name)?;

        let dir = self.uploads_dir.join(kind.dir());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| UploadError::io(&dir, e))?;

        let random = (Uuid::new_v4().as_u128() % 1_000_000_000) as u32;
        let stored_name = stored_file_name(file_name, Utc::now().timestamp_millis(), random);
        let path = dir.join(&stored_name);
        let file = File::create(&path)
            .await
            .map_err(|e| UploadError::io(&path, e))?;
        self.created.push(path.clone());

        debug!(field, file_name, path = %path.display(), "Receiving upload file");
        Ok(PendingFile {
            kind,
            original_name: file_name.to_string(),
            stored_name,
            path,
            file,
            written: 0,
            limit: self.policy.max_file_size_bytes,
        })
    }

    /// Record a finished file.
    pub fn accept(&mut self, file: StoredFile) {
        metrics::UPLOAD_BYTES.inc_by(file.size);
        self.stored.push(file);
    }

    /// The exam document, which every upload must carry.
    pub fn exam_file(&self) -> Result<&StoredFile, UploadError> {
        self.stored
            .iter()
            .find(|f| f.kind == FileKind::Exam)
            .ok_or(UploadError::MissingExamFile)
    }

    pub fn previews(&self) -> Vec<&StoredFile> {
        self.stored
            .iter()
            .filter(|f| f.kind == FileKind::Preview)
            .collect()
    }

    pub fn stored(&self) -> &[StoredFile] {
        &self.stored
    }

    /// Remove every file this session created, finished or not.
    pub async fn cleanup(self) {
        for path in &self.created {
            match fs::remove_file(path).await {
                Ok(()) => debug!(path = %path.display(), "Removed upload file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove upload file"),
            }
        }
    }
}
