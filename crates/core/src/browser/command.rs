use serde::{Deserialize, Serialize};

/// Change of one filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "camelCase")]
pub enum FilterChange {
    Subject(Option<String>),
    Difficulty(Option<String>),
    Source(Option<String>),
    Grade(Option<String>),
    FavoritesOnly(bool),
}

/// A user intent, as delivered by the page's delegated event handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum BrowseCommand {
    SetFilter(FilterChange),
    SetSearch(String),
    ResetFilters,
    /// Raw quick filter (`all`, `subject:<value>`, `tag:<value>`).
    QuickFilter(String),
    ToggleFavorite(String),
    ChangePage(usize),
    SetPageSize(usize),
    OpenDetail(String),
    CloseDetail,
    Download(String),
    /// History navigation to a location carrying a query string.
    Navigate(String),
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CommandOutcome {
    /// State changed; render a new snapshot.
    Updated,
    /// Guarded no-op: session not ready, unknown id, page out of range.
    Ignored,
    /// Held until the catalog is ready.
    Deferred,
    FavoriteToggled { id: String, favorited: bool },
    DetailOpened { id: String },
    /// Start a download of this file.
    Download(DownloadRequest),
    /// The entry has no usable file reference.
    Unavailable { id: String },
}

impl CommandOutcome {
    /// Whether the page needs to render again.
    pub fn changed_state(&self) -> bool {
        !matches!(self, Self::Ignored | Self::Deferred | Self::Unavailable { .. })
    }
}

/// A file the page should download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub id: String,
    pub url: String,
    /// `<name>.<format>`.
    pub file_name: String,
}
