use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::config::BrowseConfig;
use crate::pagination::Cursor;
use crate::runtime_cache::{Runtime, RuntimeCache};
use crate::search::{Debounced, SearchCoordinator, SearchRequest};
use crate::types::{Feed, Movie};

/// Owner of everything the browse screen shows: the popular feed, the search
/// feed, the runtime cache, and one loading indicator and error slot shared by
/// all of them.
///
/// Network work runs on spawned tasks that report back as [`Action`]s; those
/// are applied through [`BrowseSession::apply`] on the owning task, so state is
/// only ever mutated from one place. The error slot is last writer wins.
///
/// At most one popular page request is outstanding at a time. Search fetches
/// are counted rather than guarded, since superseded ones are left to finish.
pub struct BrowseSession {
    popular: Cursor<Movie>,
    search: SearchCoordinator,
    runtimes: RuntimeCache,
    popular_in_flight: bool,
    searches_in_flight: usize,
    error: Option<String>,
    debounce: Duration,
    near_tail: usize,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl BrowseSession {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        action_tx: mpsc::UnboundedSender<Action>,
        browse: &BrowseConfig,
    ) -> Self {
        Self {
            popular: Cursor::new(),
            search: SearchCoordinator::new(),
            runtimes: RuntimeCache::new(),
            popular_in_flight: false,
            searches_in_flight: 0,
            error: None,
            debounce: browse.debounce(),
            near_tail: browse.prefetch_threshold,
            catalog,
            action_tx,
        }
    }

    pub fn load_popular(&mut self, reset: bool) {
        if self.popular_in_flight {
            tracing::debug!("popular load skipped, another load is in flight");
            return;
        }
        if reset {
            self.popular.reset();
        }
        if !self.popular.more_available() {
            return;
        }
        self.spawn_load_popular(self.popular.page());
    }

    /// Drop the popular feed and the error slot, then load page one again
    pub fn refresh(&mut self) {
        self.error = None;
        self.load_popular(true);
    }

    pub fn search(&mut self, text: &str) {
        let generation = self.search.input(text);
        self.spawn_debounce(generation);
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn prefetch_runtime(&mut self, id: u64) {
        if self.runtimes.begin(id) {
            self.spawn_load_runtime(id);
        }
    }

    /// Load the next page of the feed holding `id` once it is near the tail
    pub fn load_more_if_needed(&mut self, id: u64, is_searching: bool) {
        let cursor = if is_searching {
            self.search.cursor()
        } else {
            &self.popular
        };
        let Some(index) = cursor.items().iter().position(|m| m.id == id) else {
            return;
        };
        if !cursor.should_load_more(index, self.near_tail) {
            return;
        }

        if is_searching {
            self.load_more_search();
        } else {
            self.load_popular(false);
        }
    }

    fn load_more_search(&mut self) {
        if let Some(request) = self.search.next_page() {
            self.spawn_search(request);
        }
    }

    pub fn active_feed(&self) -> Feed {
        if self.search.is_active() {
            Feed::Search
        } else {
            Feed::Popular
        }
    }

    /// Cursor of the feed currently on screen
    pub fn active_cursor(&self) -> &Cursor<Movie> {
        match self.active_feed() {
            Feed::Popular => &self.popular,
            Feed::Search => self.search.cursor(),
        }
    }

    pub fn active_list(&self) -> &[Movie] {
        self.active_cursor().items()
    }

    pub fn is_searching(&self) -> bool {
        self.active_feed() == Feed::Search
    }

    /// True while any popular or search page request is outstanding
    pub fn is_loading(&self) -> bool {
        self.popular_in_flight || self.searches_in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn runtime(&self, id: u64) -> Option<Runtime> {
        self.runtimes.get(id)
    }

    pub fn runtime_pending(&self, id: u64) -> bool {
        self.runtimes.is_pending(id)
    }

    #[cfg(test)]
    pub fn popular(&self) -> &Cursor<Movie> {
        &self.popular
    }

    pub fn search_state(&self) -> &SearchCoordinator {
        &self.search
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Apply a completion produced by one of this session's background tasks.
    /// Other actions are ignored.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::PopularLoaded(result) => {
                self.popular_in_flight = false;
                match result {
                    Ok(page) => {
                        tracing::debug!(
                            page = page.page,
                            count = page.items.len(),
                            "popular page loaded"
                        );
                        self.popular.append_page(page);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "popular load failed");
                        self.error = Some(e.to_string());
                    }
                }
            }
            Action::SearchDebounced(generation) => match self.search.debounce_elapsed(generation) {
                Debounced::Fetch(request) => {
                    self.spawn_search(request);
                }
                Debounced::Cleared => {
                    tracing::debug!("search cleared");
                }
                Debounced::Stale => {}
            },
            Action::SearchLoaded { generation, result } => {
                self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
                match result {
                    Ok(page) => {
                        if !self.search.page_loaded(generation, page) {
                            tracing::debug!(generation, "discarding stale search results");
                        }
                    }
                    Err(e) => {
                        if self.search.page_failed(generation) {
                            tracing::warn!(error = %e, "search failed");
                            self.error = Some(e.to_string());
                        }
                    }
                }
            }
            Action::RuntimeLoaded { id, result } => {
                self.runtimes.record(id, result);
            }
            _ => {}
        }
    }

    fn spawn_load_popular(&mut self, page: u32) {
        self.popular_in_flight = true;
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            let result = catalog.popular(page).await;
            tx.send(Action::PopularLoaded(result)).ok();
        });
    }

    fn spawn_debounce(&self, generation: u64) {
        let tx = self.action_tx.clone();
        let delay = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send(Action::SearchDebounced(generation)).ok();
        });
    }

    fn spawn_search(&mut self, request: SearchRequest) {
        self.searches_in_flight += 1;
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            let result = catalog.search(&request.query, request.page).await;
            tx.send(Action::SearchLoaded {
                generation: request.generation,
                result,
            })
            .ok();
        });
    }

    fn spawn_load_runtime(&self, id: u64) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            let result = catalog.movie_detail(id).await.map(|d| d.runtime);
            tx.send(Action::RuntimeLoaded { id, result }).ok();
        });
    }
}
