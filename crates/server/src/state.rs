use std::path::Path;
use std::sync::Arc;

use exam_catalog_core::{BrowseConfig, Config, MetadataStore, UploadPolicy};

/// Shared application state
pub struct AppState {
    config: Config,
    metadata: Arc<dyn MetadataStore>,
    upload_policy: UploadPolicy,
}

impl AppState {
    pub fn new(config: Config, metadata: Arc<dyn MetadataStore>) -> Self {
        let upload_policy = UploadPolicy::from(&config.upload);
        Self {
            config,
            metadata,
            upload_policy,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn browse_config(&self) -> &BrowseConfig {
        &self.config.browse
    }

    pub fn metadata(&self) -> &dyn MetadataStore {
        self.metadata.as_ref()
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    pub fn site_dir(&self) -> &Path {
        &self.config.storage.site_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.config.storage.uploads_dir
    }
}
