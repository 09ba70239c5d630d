//! Where the browsing client gets its catalog from.
//!
//! The fetch is one-shot: a source is asked once per session and its
//! failure is terminal for that session.

mod file;
mod http;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;

use async_trait::async_trait;

use crate::catalog::{CatalogError, CatalogPayload};

/// Supplies the catalog document.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the catalog.
    async fn fetch(&self) -> Result<CatalogPayload, CatalogError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}
