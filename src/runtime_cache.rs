use std::collections::{HashMap, HashSet};

use crate::error::CatalogError;

/// Outcome of a runtime lookup for one movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Minutes(u32),
    /// Fetched, but the catalog had no runtime
    Unknown,
    /// Fetch failed; not retried for the rest of the session
    Failed,
}

impl Runtime {
    /// Minutes for display, with 0 standing in for unknown or failed
    pub fn minutes(self) -> u32 {
        match self {
            Runtime::Minutes(m) => m,
            Runtime::Unknown | Runtime::Failed => 0,
        }
    }
}

/// Best-effort runtimes keyed by movie id. Entries are never evicted.
#[derive(Debug, Default)]
pub struct RuntimeCache {
    entries: HashMap<u64, Runtime>,
    in_flight: HashSet<u64>,
}

impl RuntimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for fetching. Returns false when it already has an entry
    /// (including a failure) or a request for it is outstanding.
    pub fn begin(&mut self, id: u64) -> bool {
        if self.entries.contains_key(&id) || self.in_flight.contains(&id) {
            return false;
        }
        self.in_flight.insert(id)
    }

    pub fn record(&mut self, id: u64, result: Result<Option<u32>, CatalogError>) {
        self.in_flight.remove(&id);
        match result {
            Ok(Some(minutes)) => {
                self.entries.insert(id, Runtime::Minutes(minutes));
            }
            Ok(None) => {
                self.entries.insert(id, Runtime::Unknown);
            }
            Err(e) => {
                tracing::debug!(id, error = %e, "runtime prefetch failed");
                // A failure never replaces a value we already know.
                self.entries.entry(id).or_insert(Runtime::Failed);
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<Runtime> {
        self.entries.get(&id).copied()
    }

    pub fn is_pending(&self, id: u64) -> bool {
        self.in_flight.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_claims_once() {
        let mut cache = RuntimeCache::new();
        assert!(cache.begin(42));
        assert!(!cache.begin(42));
        assert!(cache.is_pending(42));
        assert_eq!(cache.get(42), None);
    }

    #[test]
    fn success_stores_minutes() {
        let mut cache = RuntimeCache::new();
        cache.begin(42);
        cache.record(42, Ok(Some(136)));
        assert_eq!(cache.get(42), Some(Runtime::Minutes(136)));
        assert!(!cache.is_pending(42));
        assert!(!cache.begin(42));
    }

    #[test]
    fn failure_is_cached_as_sentinel() {
        let mut cache = RuntimeCache::new();
        cache.begin(7);
        cache.record(7, Err(CatalogError::Http(404)));
        assert_eq!(cache.get(7), Some(Runtime::Failed));
        assert_eq!(cache.get(7).map(Runtime::minutes), Some(0));
        assert!(!cache.begin(7));
    }

    #[test]
    fn missing_runtime_is_distinct_from_failure() {
        let mut cache = RuntimeCache::new();
        cache.record(1, Ok(None));
        cache.record(2, Err(CatalogError::Transport("reset".into())));
        assert_eq!(cache.get(1), Some(Runtime::Unknown));
        assert_eq!(cache.get(2), Some(Runtime::Failed));
        assert_eq!(cache.get(1).map(Runtime::minutes), Some(0));
    }

    #[test]
    fn late_failure_keeps_known_value() {
        let mut cache = RuntimeCache::new();
        cache.record(9, Ok(Some(90)));
        cache.record(9, Err(CatalogError::Http(500)));
        assert_eq!(cache.get(9), Some(Runtime::Minutes(90)));
        assert!(!cache.is_pending(9));
    }
}
