use tracing::{debug, info, warn};

use super::command::{BrowseCommand, CommandOutcome, DownloadRequest, FilterChange};
use super::snapshot::{BrowseSnapshot, EntryCard, FilterOptions, SessionPhase};
use crate::catalog::{CatalogEntry, CatalogStore};
use crate::config::BrowseConfig;
use crate::deeplink::DeepLinkReconciler;
use crate::favorites::{FavoritesSet, KeyValueStorage};
use crate::filter::{compute_view, FilterSpec, FilteredView, QuickFilter};
use crate::pagination::Pagination;
use crate::source::CatalogSource;

const RETRY_HINT: &str = "Reload the page to try again.";

/// One user's browsing state over the catalog.
#[derive(Debug)]
pub struct BrowseSession {
    config: BrowseConfig,
    phase: SessionPhase,
    store: CatalogStore,
    spec: FilterSpec,
    view: FilteredView,
    pagination: Pagination,
    detail: Option<String>,
    deep_link: DeepLinkReconciler,
    filter_options: FilterOptions,
}

impl BrowseSession {
    /// New session in the `Loading` phase. Favorites are loaded right away.
    pub fn new(config: BrowseConfig, storage: Box<dyn KeyValueStorage>) -> Self {
        let favorites = FavoritesSet::load(storage, config.favorites_key.clone());
        let pagination = Pagination::new(config.page_size);
        Self {
            config,
            phase: SessionPhase::Loading,
            store: CatalogStore::new(favorites),
            spec: FilterSpec::default(),
            view: FilteredView::default(),
            pagination,
            detail: None,
            deep_link: DeepLinkReconciler::new(),
            filter_options: FilterOptions::default(),
        }
    }

    /// Fetch the catalog once and become `Ready`, or `Failed` for good.
    ///
    /// Returns the id of an entry opened through a deep link that arrived
    /// while loading.
    pub async fn start(&mut self, source: &dyn CatalogSource) -> Option<String> {
        if self.phase != SessionPhase::Loading {
            warn!("Browse session already started");
            return None;
        }

        match source.fetch().await {
            Ok(payload) => {
                info!(source = %source.describe(), "Catalog fetched");
                self.store.load(payload.exams);
                self.filter_options =
                    FilterOptions::collect(self.store.entries(), &self.config.available_grades);
                self.phase = SessionPhase::Ready;
                self.recompute();

                let opened = self.deep_link.mark_ready(&self.store);
                if let Some(id) = &opened {
                    self.detail = Some(id.clone());
                }
                opened
            }
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "Failed to load catalog");
                self.phase = SessionPhase::Failed(e.to_string());
                None
            }
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Entries of the whole filtered view, in display order.
    pub fn view(&self) -> Vec<&CatalogEntry> {
        self.view.entries(self.store.entries()).collect()
    }

    pub fn detail(&self) -> Option<&CatalogEntry> {
        self.detail.as_deref().and_then(|id| self.store.get(id))
    }

    /// Apply one command.
    pub fn dispatch(&mut self, command: BrowseCommand) -> CommandOutcome {
        if let BrowseCommand::Navigate(location) = &command {
            return self.navigate(location);
        }
        if !self.is_ready() {
            debug!(?command, "Ignoring command, catalog not ready");
            return CommandOutcome::Ignored;
        }

        match command {
            BrowseCommand::SetFilter(change) => {
                let mut spec = self.spec.clone();
                match change {
                    FilterChange::Subject(v) => spec.subject = v,
                    FilterChange::Difficulty(v) => spec.difficulty = v,
                    FilterChange::Source(v) => spec.source = v,
                    FilterChange::Grade(v) => spec.grade = v,
                    FilterChange::FavoritesOnly(on) => spec.favorites_only = on,
                }
                self.apply_spec(spec)
            }
            BrowseCommand::SetSearch(search) => {
                let spec = FilterSpec {
                    search,
                    ..self.spec.clone()
                };
                self.apply_spec(spec)
            }
            BrowseCommand::ResetFilters => self.apply_spec(FilterSpec::default()),
            BrowseCommand::QuickFilter(raw) => match QuickFilter::parse(&raw) {
                Some(quick) => {
                    let spec = quick.apply(&self.spec);
                    self.apply_spec(spec)
                }
                None => {
                    debug!(filter = %raw, "Unknown quick filter");
                    CommandOutcome::Ignored
                }
            },
            BrowseCommand::ToggleFavorite(id) => {
                if !self.store.contains(&id) {
                    return CommandOutcome::Ignored;
                }
                let favorited = self.store.toggle_favorite(&id);
                self.recompute();
                CommandOutcome::FavoriteToggled { id, favorited }
            }
            BrowseCommand::ChangePage(page) => {
                if self.pagination.go_to_page(page) {
                    CommandOutcome::Updated
                } else {
                    debug!(page, total = self.pagination.total_pages(), "Page out of range");
                    CommandOutcome::Ignored
                }
            }
            BrowseCommand::SetPageSize(size) => {
                self.pagination.set_page_size(size);
                CommandOutcome::Updated
            }
            BrowseCommand::OpenDetail(id) => self.open_detail(id),
            BrowseCommand::CloseDetail => {
                if self.detail.take().is_some() {
                    CommandOutcome::Updated
                } else {
                    CommandOutcome::Ignored
                }
            }
            BrowseCommand::Download(id) => self.download(&id),
            BrowseCommand::Navigate(_) => CommandOutcome::Ignored,
        }
    }

    /// The render input for the current state.
    pub fn snapshot(&self) -> BrowseSnapshot {
        let entries = self.store.entries();
        let items = self
            .view
            .slice(entries, self.pagination.range())
            .into_iter()
            .map(|entry| self.card(entry))
            .collect();

        let retry_hint = match self.phase {
            SessionPhase::Failed(_) => Some(RETRY_HINT.to_string()),
            _ => None,
        };

        BrowseSnapshot {
            phase: self.phase.clone(),
            retry_hint,
            items,
            current_page: self.pagination.current_page(),
            total_pages: self.pagination.total_pages(),
            total_matches: self.view.len(),
            page_links: self.pagination.links(),
            detail: self.detail().map(|entry| self.card(entry)),
            filter_options: self.filter_options.clone(),
            filters: self.spec.clone(),
        }
    }

    fn card(&self, entry: &CatalogEntry) -> EntryCard {
        EntryCard {
            entry: entry.clone(),
            favorite: self.store.is_favorite(&entry.id),
        }
    }

    /// Replace the filter spec and show the first page of the new view.
    fn apply_spec(&mut self, spec: FilterSpec) -> CommandOutcome {
        self.spec = spec;
        self.recompute();
        self.pagination.go_to_page(1);
        CommandOutcome::Updated
    }

    /// Filter, sort, then clamp the pagination to the new view.
    fn recompute(&mut self) {
        self.view = compute_view(self.store.entries(), self.store.favorites(), &self.spec);
        self.pagination.recompute(self.view.len());
        debug!(
            matches = self.view.len(),
            page = self.pagination.current_page(),
            total_pages = self.pagination.total_pages(),
            "View recomputed"
        );
    }

    fn open_detail(&mut self, id: String) -> CommandOutcome {
        if !self.store.contains(&id) {
            return CommandOutcome::Ignored;
        }
        self.detail = Some(id.clone());
        CommandOutcome::DetailOpened { id }
    }

    fn navigate(&mut self, location: &str) -> CommandOutcome {
        if self.is_ready() {
            match self.deep_link.on_location(location, &self.store) {
                Some(id) => self.open_detail(id),
                None => CommandOutcome::Ignored,
            }
        } else if matches!(self.phase, SessionPhase::Failed(_)) {
            CommandOutcome::Ignored
        } else {
            self.deep_link.on_location(location, &self.store);
            CommandOutcome::Deferred
        }
    }

    fn download(&mut self, id: &str) -> CommandOutcome {
        let Some(entry) = self.store.get(id) else {
            return CommandOutcome::Ignored;
        };
        if !entry.has_download() {
            return CommandOutcome::Unavailable { id: id.to_string() };
        }
        let request = DownloadRequest {
            id: id.to_string(),
            url: entry.file_url.clone(),
            file_name: entry.download_file_name(),
        };

        self.store.record_download(id);
        self.recompute();
        info!(id = %id, file = %request.file_name, "Download started");
        CommandOutcome::Download(request)
    }
}
