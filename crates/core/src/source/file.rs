use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::CatalogSource;
use crate::catalog::{parse_payload, CatalogError, CatalogPayload};

/// Reads the catalog from a local metadata file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<CatalogPayload, CatalogError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            CatalogError::Fetch(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Read catalog file");
        parse_payload(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
