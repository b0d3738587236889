//! Bounded cache of ranked locators keyed by descriptor identity

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::descriptor::ElementDescriptor;
use crate::types::RankedLocators;

/// Default number of ranked results kept per process
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Bounded descriptor-key → ranked-result cache with oldest-first eviction.
///
/// Reads share the lock; insert and evict happen under one write guard.
#[derive(Debug)]
pub struct LocatorCache {
    state: RwLock<CacheState>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, RankedLocators>,
    insertion_order: VecDeque<String>,
}

/// Counter snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

impl Default for LocatorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl LocatorCache {
    /// Create a cache; a zero capacity is raised to one entry
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, descriptor: &ElementDescriptor) -> Option<RankedLocators> {
        self.state
            .read()
            .entries
            .get(&descriptor.identity_key())
            .cloned()
    }

    /// Return the cached result for `descriptor`, computing and storing it on
    /// a miss.
    pub fn get_or_compute<F>(&self, descriptor: &ElementDescriptor, compute: F) -> RankedLocators
    where
        F: FnOnce(&ElementDescriptor) -> RankedLocators,
    {
        let key = descriptor.identity_key();
        if let Some(hit) = self.state.read().entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = compute(descriptor);

        let mut state = self.state.write();
        if let Some(existing) = state.entries.get(&key) {
            // Another worker stored the same descriptor while we computed.
            return existing.clone();
        }
        state.entries.insert(key.clone(), computed.clone());
        state.insertion_order.push_back(key);

        while state.entries.len() > self.capacity {
            let Some(oldest) = state.insertion_order.pop_front() else {
                break;
            };
            if state.entries.remove(&oldest).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(key = %oldest, "evicted cached locators");
            }
        }

        computed
    }

    pub fn clear(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.insertion_order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
