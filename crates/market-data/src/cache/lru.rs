//! Fixed-capacity least-recently-used cache.
//!
//! Backs the item, icon, and history caches. Reads are deliberate peeks:
//! only `set` and `touch` change recency, so a presentation layer can walk
//! the cache without reordering it. Eviction is strict recency, one entry
//! per overflowing insert; there is no TTL or other expiry.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A bounded cache that evicts the least-recently-used entry on overflow.
///
/// Recency order is tracked separately from storage: `order` holds keys
/// most-recent-first, and every key in `order` has an entry in `map`.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "LruCache capacity must be at least 1");
        Self {
            capacity,
            map: HashMap::with_capacity(capacity + 1),
            order: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Look up a value without changing its recency.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Insert or overwrite a value, making it the most recently used.
    ///
    /// If the insert pushes the cache over capacity, the single
    /// least-recently-used entry is evicted. Overwriting an existing key
    /// never counts twice toward capacity.
    pub fn set(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.unlink(&key);
        }
        self.order.push_front(key);

        if self.map.len() > self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                self.map.remove(&evicted);
            }
        }
    }

    /// Promote a key to most recently used.
    ///
    /// Returns `false` without side effects if the key is absent.
    pub fn touch(&mut self, key: &K) -> bool {
        if !self.map.contains_key(key) {
            return false;
        }
        self.unlink(key);
        self.order.push_front(key.clone());
        true
    }

    /// The most recently used value, if any.
    pub fn most_recent(&self) -> Option<&V> {
        self.order.front().and_then(|key| self.map.get(key))
    }

    /// The least recently used value, if any.
    pub fn least_recent(&self) -> Option<&V> {
        self.order.back().and_then(|key| self.map.get(key))
    }

    /// Entries in recency order, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .iter()
            .filter_map(|key| self.map.get(key).map(|value| (key, value)))
    }

    /// Whether the key is present. Does not change recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Remove a key from the recency order (storage untouched).
    fn unlink(&mut self, key: &K) {
        if let Some(position) = self.order.iter().position(|k| k == key) {
            self.order.remove(position);
        }
    }
}
