//! Explicit caches for derived rendering resources.
//!
//! Derived resources (rasterized text, scaled sprites) are cheap to rebuild
//! but wasteful to rebuild every frame. Instead of module-level memo tables,
//! the runtime owns one [`ResourceCache`] per resource kind, keyed by a
//! structured key, capped in size, and cleared on every scene swap.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Default entry cap for [`ResourceCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Structured key for cached images: a resource name plus the pixel size it
/// was derived at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub name: String,
    pub pixel_size: u32,
}

impl ImageKey {
    pub fn new(name: impl Into<String>, pixel_size: u32) -> Self {
        Self {
            name: name.into(),
            pixel_size,
        }
    }
}

/// Images derived for the current scene, evicted on scene swap.
pub type ImageCache<I> = ResourceCache<ImageKey, I>;

/// A capped key/value cache with insertion-order eviction.
pub struct ResourceCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Clone + Eq + Hash, V> ResourceCache<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// `capacity` must be at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert a value, evicting the oldest entry if the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        if !self.entries.contains_key(&key) {
            if self.entries.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key.clone());
        }
        self.entries.insert(key, value);
    }

    /// Fetch the cached value for `key`, building and inserting it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, build: impl FnOnce() -> V) -> &V {
        if !self.entries.contains_key(&key) {
            self.insert(key.clone(), build());
        }
        self.entries
            .get(&key)
            .expect("entry inserted on the miss path above")
    }

    /// Drop every entry. Called at scene-swap boundaries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<K: Clone + Eq + Hash, V> Default for ResourceCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
