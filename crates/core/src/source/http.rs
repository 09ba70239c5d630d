use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use tracing::debug;

use super::CatalogSource;
use crate::catalog::{parse_payload, CatalogError, CatalogPayload};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the catalog document over HTTP, bypassing caches.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<CatalogPayload, CatalogError> {
        debug!(url = %self.url, "Fetching catalog");

        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Fetch(format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Fetch(format!("failed to read body: {}", e)))?;
        parse_payload(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
