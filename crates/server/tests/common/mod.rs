//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router on top of a metadata file, upload
//! directory and site directory inside a temp dir, so every request goes
//! through the same stack the binary serves.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use exam_catalog_core::config::StorageConfig;
use exam_catalog_core::{CatalogEntry, Config, JsonMetadataStore, MetadataStore};

/// Re-export fixtures for test convenience
pub use exam_catalog_core::testing::fixtures;

const BOUNDARY: &str = "examcat-test-boundary";

/// Test fixture for in-process API testing.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Store backing the router, for seeding and inspection
    pub metadata: Arc<JsonMetadataStore>,
    /// Temporary directory holding the site, metadata and uploads
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

/// One part of a multipart upload.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content: &'a [u8],
    },
}

impl TestFixture {
    /// Create a fixture with an empty catalog and default limits.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a fixture seeded with `entries`, in the given order.
    pub async fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        let fixture = Self::new().await;
        for entry in entries.into_iter().rev() {
            fixture.metadata.insert(entry).expect("Failed to seed entry");
        }
        fixture
    }

    /// Create a fixture from `config`; its storage paths are replaced with
    /// temp dir locations.
    pub async fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let site_dir = temp_dir.path().join("site");
        std::fs::create_dir_all(&site_dir).expect("Failed to create site dir");
        std::fs::write(site_dir.join("index.html"), "<html>catalog</html>")
            .expect("Failed to write index.html");

        config.storage = StorageConfig {
            metadata_file: site_dir.join("metadata.json"),
            uploads_dir: site_dir.join("uploads"),
            site_dir,
        };

        let metadata = Arc::new(
            JsonMetadataStore::open(&config.storage.metadata_file)
                .expect("Failed to open metadata store"),
        );

        let state = Arc::new(exam_catalog_server::state::AppState::new(
            config,
            Arc::clone(&metadata) as Arc<dyn MetadataStore>,
        ));
        let router = exam_catalog_server::api::create_router(state);

        Self {
            router,
            metadata,
            temp_dir,
        }
    }

    /// Upload directory of this fixture.
    pub fn uploads_dir(&self) -> PathBuf {
        self.temp_dir.path().join("site").join("uploads")
    }

    /// Number of files stored under `uploads/<kind>`.
    pub fn stored_files(&self, kind: &str) -> usize {
        std::fs::read_dir(self.uploads_dir().join(kind))
            .map(|dir| dir.count())
            .unwrap_or(0)
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::builder().method("GET").uri(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a PUT request without a body.
    pub async fn put(&self, path: &str) -> TestResponse {
        self.send(Request::builder().method("PUT").uri(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a multipart POST request.
    pub async fn post_multipart(&self, path: &str, parts: &[Part<'_>]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        field, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
