use crate::pagination::Cursor;
use crate::types::{Movie, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Waiting for the debounce delay to pass without further input
    Pending,
    Fetching,
}

/// What to do when a debounce timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Debounced {
    /// Newer input arrived after this timer was armed
    Stale,
    /// Query is blank; results were cleared
    Cleared,
    Fetch(SearchRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub generation: u64,
}

/// Debounced incremental search over the catalog.
///
/// Every keystroke bumps `generation`; timers and fetches capture the
/// generation they were started under and are ignored on arrival if it has
/// moved on. Nothing is cancelled in flight.
#[derive(Debug, Default)]
pub struct SearchCoordinator {
    query: String,
    generation: u64,
    phase: SearchPhase,
    cursor: Cursor<Movie>,
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw input event; returns the generation the debounce timer must carry
    pub fn input(&mut self, text: &str) -> u64 {
        self.generation += 1;
        self.query = text.to_string();
        self.phase = SearchPhase::Pending;
        self.generation
    }

    pub fn debounce_elapsed(&mut self, generation: u64) -> Debounced {
        if generation != self.generation {
            return Debounced::Stale;
        }

        self.cursor.reset();
        let query = self.query.trim();
        if query.is_empty() {
            self.phase = SearchPhase::Idle;
            return Debounced::Cleared;
        }

        self.phase = SearchPhase::Fetching;
        Debounced::Fetch(SearchRequest {
            query: query.to_string(),
            page: self.cursor.page(),
            generation,
        })
    }

    /// Next page for the current query, reusing its generation. `None` when
    /// the query is blank, a fetch is outstanding, or the results are exhausted.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        let query = self.query.trim();
        if query.is_empty() || self.phase != SearchPhase::Idle || !self.cursor.more_available() {
            return None;
        }
        let request = SearchRequest {
            query: query.to_string(),
            page: self.cursor.page(),
            generation: self.generation,
        };
        self.phase = SearchPhase::Fetching;
        Some(request)
    }

    /// Apply a fetched page. Returns false (and changes nothing) when stale.
    pub fn page_loaded(&mut self, generation: u64, page: Page<Movie>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.cursor.append_page(page);
        self.phase = SearchPhase::Idle;
        true
    }

    /// Note a failed fetch. Returns false when stale.
    pub fn page_failed(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.phase = SearchPhase::Idle;
        true
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.query.clear();
        self.phase = SearchPhase::Idle;
        self.cursor.reset();
    }

    /// True when the trimmed query is non-empty
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn cursor(&self) -> &Cursor<Movie> {
        &self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(ids: std::ops::Range<u64>, total: Option<u32>) -> Page<Movie> {
        Page {
            items: ids
                .map(|id| Movie {
                    id,
                    title: format!("Movie {}", id),
                    poster_path: None,
                    rating: 5.0,
                    release_date: None,
                })
                .collect(),
            page: 1,
            total_pages: total,
        }
    }

    #[test]
    fn only_latest_timer_fires_a_fetch() {
        let mut search = SearchCoordinator::new();
        let g1 = search.input("b");
        let g2 = search.input("ba");
        let g3 = search.input("bat");

        assert_eq!(search.debounce_elapsed(g1), Debounced::Stale);
        assert_eq!(search.debounce_elapsed(g2), Debounced::Stale);
        assert_eq!(
            search.debounce_elapsed(g3),
            Debounced::Fetch(SearchRequest {
                query: "bat".into(),
                page: 1,
                generation: g3,
            })
        );
        assert_eq!(search.phase(), SearchPhase::Fetching);
    }

    #[test]
    fn blank_query_clears_results() {
        let mut search = SearchCoordinator::new();
        let g = search.input("alien");
        search.debounce_elapsed(g);
        assert!(search.page_loaded(g, movies(0..20, Some(3))));
        assert_eq!(search.cursor().page(), 2);

        let g = search.input("   ");
        assert_eq!(search.debounce_elapsed(g), Debounced::Cleared);
        assert!(search.cursor().is_empty());
        assert_eq!(search.cursor().page(), 1);
        assert!(!search.is_active());
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut search = SearchCoordinator::new();
        let old = search.input("ali");
        search.debounce_elapsed(old);
        let new = search.input("alien");

        assert!(!search.page_loaded(old, movies(0..20, Some(5))));
        assert!(search.cursor().is_empty());
        assert_eq!(search.phase(), SearchPhase::Pending);
        assert!(!search.page_failed(old));
        assert_eq!(search.generation(), new);
    }

    #[test]
    fn next_page_reuses_generation() {
        let mut search = SearchCoordinator::new();
        let g = search.input("alien");
        search.debounce_elapsed(g);
        search.page_loaded(g, movies(0..20, Some(2)));

        let request = search.next_page().unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.generation, g);
        assert_eq!(request.query, "alien");

        // Outstanding fetch blocks a second load-more
        assert_eq!(search.next_page(), None);

        search.page_loaded(g, movies(20..30, Some(2)));
        assert!(!search.cursor().more_available());
        assert_eq!(search.next_page(), None);
    }

    #[test]
    fn failed_fetch_returns_to_idle() {
        let mut search = SearchCoordinator::new();
        let g = search.input("alien");
        search.debounce_elapsed(g);
        assert!(search.page_failed(g));
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.next_page().is_some());
    }

    #[test]
    fn clear_invalidates_pending_timer() {
        let mut search = SearchCoordinator::new();
        let g = search.input("alien");
        search.clear();
        assert_eq!(search.debounce_elapsed(g), Debounced::Stale);
        assert_eq!(search.query(), "");
        assert!(search.next_page().is_none());
    }
}
