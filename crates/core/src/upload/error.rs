//! Error types for the upload module.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur while receiving an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file's extension is not allowed for its field.
    #[error("Unsupported file type for {field}, allowed: {}", .allowed.join(", "))]
    FileType { field: String, allowed: Vec<String> },

    /// A file exceeded the per-file size limit.
    #[error("File too large for {field}, the limit is {limit} bytes")]
    FileTooLarge { field: String, limit: u64 },

    /// More files than allowed.
    #[error("Too many files, at most {limit} allowed")]
    TooManyFiles { limit: usize },

    /// The required exam document is absent.
    #[error("An exam file is required")]
    MissingExamFile,

    /// A file arrived under a field name that takes no files.
    #[error("Unexpected file field: {field}")]
    UnexpectedField { field: String },

    /// The request body could not be read as a multipart form.
    #[error("Malformed upload: {0}")]
    Malformed(String),

    /// Failed to write a stored file.
    #[error("Failed to store file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recording the entry in the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl UploadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code the rejection maps to.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::FileType { .. }
            | Self::FileTooLarge { .. }
            | Self::TooManyFiles { .. }
            | Self::MissingExamFile
            | Self::UnexpectedField { .. }
            | Self::Malformed(_) => 400,
            Self::Catalog(CatalogError::NotFound(_)) => 404,
            Self::Io { .. } | Self::Catalog(_) => 500,
        }
    }

    /// Label used for the upload outcome metric.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::FileType { .. } => "file_type",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::TooManyFiles { .. } => "too_many_files",
            Self::MissingExamFile => "missing_exam_file",
            Self::UnexpectedField { .. } => "unexpected_field",
            Self::Malformed(_) => "malformed",
            Self::Io { .. } | Self::Catalog(_) => "failed",
        }
    }
}
