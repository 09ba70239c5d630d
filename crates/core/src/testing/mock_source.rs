//! In-memory catalog source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{CatalogEntry, CatalogError, CatalogPayload};
use crate::source::CatalogSource;

enum Response {
    Entries(Vec<CatalogEntry>),
    Fail(String),
}

/// Catalog source that returns configured entries or a configured failure.
pub struct MockCatalogSource {
    response: Mutex<Response>,
    fetches: AtomicUsize,
}

impl MockCatalogSource {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            response: Mutex::new(Response::Entries(entries)),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose fetch fails with a data format error.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Mutex::new(Response::Fail(message.to_string())),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_entries(&self, entries: Vec<CatalogEntry>) {
        if let Ok(mut response) = self.response.lock() {
            *response = Response::Entries(entries);
        }
    }

    /// Number of fetches performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch(&self) -> Result<CatalogPayload, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let response = self
            .response
            .lock()
            .map_err(|_| CatalogError::Internal("mock lock poisoned".to_string()))?;
        match &*response {
            Response::Entries(entries) => Ok(CatalogPayload {
                exams: entries.clone(),
                last_updated: None,
            }),
            Response::Fail(message) => Err(CatalogError::DataFormat(message.clone())),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
