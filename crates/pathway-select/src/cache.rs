//! Memoized per-path lookups.
//!
//! Related paths and dependency chains are cached by path id. The catalog
//! never changes under a live engine, so entries are only dropped all at
//! once by [`PathCache::clear`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Hit and size counters for a [`PathCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Cached related-path lists.
    pub related_entries: usize,
    /// Cached dependency chains.
    pub dependency_entries: usize,
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    related: HashMap<String, Vec<String>>,
    dependency: HashMap<String, Vec<String>>,
    hits: u64,
    misses: u64,
}

/// Related-path and dependency-chain cache keyed by path id.
#[derive(Debug, Default)]
pub struct PathCache {
    state: Mutex<CacheState>,
}

impl PathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached related paths of `path_id`, computing them on a miss.
    pub fn related(&self, path_id: &str, compute: impl FnOnce() -> Vec<String>) -> Vec<String> {
        let mut state = self.lock();
        if let Some(hit) = state.related.get(path_id).cloned() {
            state.hits += 1;
            return hit;
        }
        state.misses += 1;
        let value = compute();
        state.related.insert(path_id.to_string(), value.clone());
        value
    }

    /// Cached dependency chain of `path_id`, computing it on a miss.
    pub fn dependency_chain(
        &self,
        path_id: &str,
        compute: impl FnOnce() -> Vec<String>,
    ) -> Vec<String> {
        let mut state = self.lock();
        if let Some(hit) = state.dependency.get(path_id).cloned() {
            state.hits += 1;
            return hit;
        }
        state.misses += 1;
        let value = compute();
        state.dependency.insert(path_id.to_string(), value.clone());
        value
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        *self.lock() = CacheState::default();
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            related_entries: state.related.len(),
            dependency_entries: state.dependency.len(),
            hits: state.hits,
            misses: state.misses,
        }
    }

    // The state is plain data; a panic mid-update leaves it usable.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_miss_then_hit() {
        let cache = PathCache::new();
        let mut calls = 0;

        let first = cache.related("a", || {
            calls += 1;
            vec!["b".to_string()]
        });
        let second = cache.related("a", || {
            calls += 1;
            Vec::new()
        });

        assert_eq!(first, second);
        assert_eq!(calls, 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.related_entries, 1);
        assert_eq!(stats.dependency_entries, 0);
    }

    #[test]
    fn test_maps_are_independent() {
        let cache = PathCache::new();
        cache.related("a", || vec!["r".to_string()]);
        let chain = cache.dependency_chain("a", || vec!["a".to_string()]);
        assert_eq!(chain, vec!["a"]);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let cache = PathCache::new();
        cache.related("a", Vec::new);
        cache.dependency_chain("a", Vec::new);
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
