pub mod browser;
pub mod catalog;
pub mod config;
pub mod deeplink;
pub mod favorites;
pub mod filter;
pub mod metadata;
pub mod metrics;
pub mod pagination;
pub mod source;
pub mod testing;
pub mod upload;

pub use browser::{
    BrowseCommand, BrowseSession, BrowseSnapshot, CommandOutcome, DownloadRequest, FilterChange,
    SessionPhase,
};
pub use catalog::{CatalogEntry, CatalogError, CatalogPayload, CatalogStats, CatalogStore};
pub use config::{
    load_config, load_config_from_str, validate_config, BrowseConfig, Config, ConfigError,
    UploadConfig,
};
pub use favorites::{FavoritesSet, KeyValueStorage, StorageError};
pub use filter::{compute_view, FilterSpec, FilteredView};
pub use metadata::{CounterField, ExamQuery, JsonMetadataStore, MetadataStore};
pub use pagination::{paginate, Page, PageLink, Pagination};
pub use source::{CatalogSource, FileCatalogSource, HttpCatalogSource};
pub use upload::{UploadError, UploadForm, UploadPolicy, UploadSession};
