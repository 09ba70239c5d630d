//! Shareable links that open one entry.
//!
//! A location is looked at on initial load and on every history navigation.
//! Until the catalog has loaded, the requested id is held back and resolved
//! once [`DeepLinkReconciler::mark_ready`] is called.

use tracing::debug;

use crate::catalog::CatalogStore;

/// Query parameter carrying the entry id.
pub const DEEP_LINK_PARAM: &str = "exam";

/// Extract the entry id from a URL query string (with or without the leading
/// `?`, or a full URL). Percent escapes are decoded and `+` is a space.
pub fn parse_deep_link(location: &str) -> Option<String> {
    let query = match location.split_once('?') {
        Some((_, query)) => query,
        None if location.contains('=') => location,
        None => return None,
    };
    let query = query.split('#').next().unwrap_or_default();

    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if decode(name) != DEEP_LINK_PARAM {
            return None;
        }
        let value = decode(value);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// Link that opens `id` on the page at `base_url`.
pub fn share_url(base_url: &str, id: &str) -> String {
    let base = base_url.split(['?', '#']).next().unwrap_or(base_url);
    format!("{}?{}={}", base, DEEP_LINK_PARAM, urlencoding::encode(id))
}

/// Maps the location's deep link to an entry to open.
#[derive(Debug, Default)]
pub struct DeepLinkReconciler {
    ready: bool,
    pending: Option<String>,
}

impl DeepLinkReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The id waiting for the catalog, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Handle a location (initial load or history navigation).
    ///
    /// Returns the id of a loaded entry to open. Before the catalog is ready
    /// the id is remembered instead (a later location replaces it) and
    /// `None` is returned.
    pub fn on_location(&mut self, location: &str, store: &CatalogStore) -> Option<String> {
        let requested = parse_deep_link(location);
        if !self.ready {
            debug!(id = ?requested, "Deep link deferred until catalog is ready");
            self.pending = requested;
            return None;
        }
        requested.filter(|id| store.contains(id))
    }

    /// Signal that the catalog finished loading and resolve any held link.
    pub fn mark_ready(&mut self, store: &CatalogStore) -> Option<String> {
        self.ready = true;
        self.pending.take().filter(|id| store.contains(id))
    }
}
