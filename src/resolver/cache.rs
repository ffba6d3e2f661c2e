use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::hierarchy::ClassId;
use crate::resolver::Resolution;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute an outcome.
    pub misses: u64,
    /// Number of cached outcomes.
    pub entries: usize,
}

/// Concurrent cache of resolution outcomes keyed by class identity.
///
/// Populated lazily and never invalidated while a run is in progress:
/// outcomes are pure functions of immutable class metadata. Concurrent
/// misses for the same class may compute redundantly; the first stored
/// outcome wins and every caller returns it.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<ClassId, Resolution>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached outcome without touching the counters.
    #[must_use]
    pub fn get(&self, class: ClassId) -> Option<Resolution> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class)
            .copied()
    }

    /// Store `resolution` unless an outcome is already present; returns the stored
    /// outcome.
    pub fn insert_if_absent(&self, class: ClassId, resolution: Resolution) -> Resolution {
        // Entries are write-once, so a poisoned map is still consistent.
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *guard.entry(class).or_insert(resolution)
    }

    /// Return the cached outcome for `class`, computing and storing it on a
    /// miss.
    pub fn get_or_compute<F>(&self, class: ClassId, compute: F) -> Resolution
    where
        F: FnOnce() -> Resolution,
    {
        if let Some(resolution) = self.get(class) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return resolution;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Computed outside the lock; a racing thread may store first.
        let computed = compute();
        self.insert_if_absent(class, computed)
    }

    /// Number of cached outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached outcome and reset the counters.
    ///
    /// Only call between runs; outcomes must stay stable within a run.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use crate::policy::Mode;

    use super::*;

    fn nested(mode: Mode) -> Resolution {
        Resolution::Nested {
            enclosing: ClassId::new(),
            mode,
        }
    }

    #[test]
    fn miss_computes_and_hit_reuses() {
        let cache = ResolutionCache::new();
        let class = ClassId::new();
        let mut calls = 0;

        let first = cache.get_or_compute(class, || {
            calls += 1;
            nested(Mode::Inherit)
        });
        let second = cache.get_or_compute(class, || {
            calls += 1;
            Resolution::TopLevel
        });

        assert_eq!(first.mode(), Mode::Inherit);
        assert_eq!(second, first);
        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn first_insert_wins() {
        let cache = ResolutionCache::new();
        let class = ClassId::new();
        assert_eq!(cache.insert_if_absent(class, Resolution::TopLevel), Resolution::TopLevel);
        let stored = cache.insert_if_absent(class, nested(Mode::Inherit));
        assert_eq!(stored, Resolution::TopLevel);
        assert_eq!(cache.get(class), Some(Resolution::TopLevel));
    }

    #[test]
    fn clear_resets_entries_and_counters() {
        let cache = ResolutionCache::new();
        cache.get_or_compute(ClassId::new(), || nested(Mode::Inherit));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn concurrent_population_is_consistent() {
        let cache = Arc::new(ResolutionCache::new());
        let classes: Vec<ClassId> = (0..16).map(|_| ClassId::new()).collect();
        let outer = ClassId::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let classes = classes.clone();
                thread::spawn(move || {
                    classes
                        .iter()
                        .map(|c| {
                            cache.get_or_compute(*c, || Resolution::Nested {
                                enclosing: outer,
                                mode: Mode::Inherit,
                            })
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let modes = handle.join().unwrap();
            assert!(modes.iter().all(|r| r.is_inherited()));
        }
        assert_eq!(cache.len(), classes.len());
    }
}
