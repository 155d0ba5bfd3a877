//! Caching layer for derived transcript sequences
//!
//! Assembling the mRNA, CDS and protein of a transcript is the most
//! expensive step of classifying a coding variant. [`SequenceCache`] keeps
//! those results in a bounded LRU map keyed by transcript marker, shared
//! across threads.
//!
//! A capacity of zero disables caching: every lookup computes afresh.
//!
//! # Example
//!
//! ```
//! use ferro_effect::cache::SequenceCache;
//!
//! let cache = SequenceCache::new(1000);
//! assert!(cache.is_enabled());
//! println!("Cache stats: {:?}", cache.stats());
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::codon::CodonTable;
use crate::model::{MarkerId, Transcript, TranscriptSequences};

/// Statistics for cache usage
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of items currently in cache
    pub size: usize,
    /// Maximum cache capacity
    pub capacity: usize,
    /// Number of evictions
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Thread-safe LRU cache implementation
pub struct LruCache<K: Hash + Eq + Clone, V: Clone> {
    /// Cache entries with their last access stamp
    entries: RwLock<HashMap<K, (V, u64)>>,
    capacity: usize,
    /// Access counter for LRU tracking
    access_counter: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    /// Create a new LRU cache; `capacity == 0` stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
            access_counter: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so
    // a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, (V, u64)>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, (V, u64)>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a value from the cache
    ///
    /// Statistics counters use `Relaxed` ordering; counts may be slightly
    /// inconsistent under heavy concurrent access.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.read();
        if let Some((value, _)) = entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            // Access time is not refreshed on read to stay on the read lock
            Some(value.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert a value into the cache
    pub fn insert(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let access = self.access_counter.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.write();

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            self.evict_lru(&mut entries);
        }

        entries.insert(key, (value, access));
    }

    /// Evict the least recently used entry
    fn evict_lru(&self, entries: &mut HashMap<K, (V, u64)>) {
        if let Some(lru_key) = entries
            .iter()
            .min_by_key(|(_, (_, access))| *access)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&lru_key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.read();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: entries.len(),
            capacity: self.capacity,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache of [`TranscriptSequences`] keyed by transcript marker and codon
/// table.
///
/// Two threads missing on the same key both compute the value; the second
/// insert overwrites the first with an identical entry.
pub struct SequenceCache {
    cache: LruCache<(MarkerId, &'static str), Arc<TranscriptSequences>>,
}

impl SequenceCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.capacity > 0
    }

    /// Sequences of `tr` translated with `table`, computed on a miss.
    ///
    /// Returns `None` when the transcript has no sequence.
    pub fn get_or_compute(&self, tr: &Transcript<'_>, table: &CodonTable) -> Option<Arc<TranscriptSequences>> {
        let key = (tr.id(), table.name());
        if let Some(seqs) = self.cache.get(&key) {
            return Some(seqs);
        }
        let seqs = Arc::new(tr.compute_sequences(table)?);
        if !seqs.warnings.is_empty() {
            tracing::warn!(
                "Transcript {} failed sanity checks: {:?}",
                tr.name(),
                seqs.warnings
            );
        }
        self.cache.insert(key, Arc::clone(&seqs));
        Some(seqs)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for SequenceCache {
    fn default() -> Self {
        Self::new(1024)
    }
}
