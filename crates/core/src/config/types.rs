use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

/// Where the catalog page, the metadata file and uploaded files live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Static root of the browsing page.
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,
    /// JSON catalog file.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: PathBuf,
    /// Upload root; holds `files/` and `previews/`.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            metadata_file: default_metadata_file(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_metadata_file() -> PathBuf {
    PathBuf::from("site/metadata.json")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("site/uploads")
}

/// Upload limits and accepted file types.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Per-file size limit in bytes (default: 50 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Maximum number of files in one request (exam file + previews)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Maximum number of preview images
    #[serde(default = "default_max_previews")]
    pub max_previews: usize,
    #[serde(default = "default_exam_extensions")]
    pub exam_extensions: Vec<String>,
    #[serde(default = "default_preview_extensions")]
    pub preview_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            max_files: default_max_files(),
            max_previews: default_max_previews(),
            exam_extensions: default_exam_extensions(),
            preview_extensions: default_preview_extensions(),
        }
    }
}

fn default_max_file_size() -> u64 {
    50 * 1024 * 1024
}

fn default_max_files() -> usize {
    6
}

fn default_max_previews() -> usize {
    5
}

fn default_exam_extensions() -> Vec<String> {
    [".pdf", ".doc", ".docx"].iter().map(|s| s.to_string()).collect()
}

fn default_preview_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".gif", ".webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Settings for the browsing client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Storage key the favorites set is persisted under.
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
    #[serde(default = "default_quick_filters")]
    pub quick_filters: Vec<QuickFilterConfig>,
    #[serde(default = "default_available_grades")]
    pub available_grades: Vec<String>,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            favorites_key: default_favorites_key(),
            quick_filters: default_quick_filters(),
            available_grades: default_available_grades(),
        }
    }
}

/// A one-click filter button (`all`, `subject:<value>` or `tag:<value>`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuickFilterConfig {
    pub label: String,
    pub filter: String,
}

fn default_page_size() -> usize {
    12
}

fn default_favorites_key() -> String {
    "exam_favorites_v5".to_string()
}

fn default_quick_filters() -> Vec<QuickFilterConfig> {
    [
        ("全部", "all"),
        ("数学", "subject:数学"),
        ("英语", "subject:英语"),
        ("物理", "subject:物理"),
        ("化学", "subject:化学"),
    ]
    .iter()
    .map(|(label, filter)| QuickFilterConfig {
        label: label.to_string(),
        filter: filter.to_string(),
    })
    .collect()
}

fn default_available_grades() -> Vec<String> {
    ["高一", "高二", "高三"].iter().map(|s| s.to_string()).collect()
}
