//! LRU library item cache
//!
//! Concrete [`LibraryItemCache`] with three independently sized partitions
//! (titles, subtitles, artwork). Each partition evicts its own least
//! recently used entry when full; filling one partition never evicts from
//! another.

use crate::LibraryItemCache;
use lru::LruCache;
use medley_core::{Artwork, ItemId};
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on a single partition's capacity, in entries.
///
/// Capacities beyond this are taken as a configuration mistake (e.g. a
/// byte count passed where an entry count was expected) rather than a real
/// sizing decision.
pub const MAX_PARTITION_CAPACITY: usize = 1 << 20;

/// Error raised when a cache is constructed with an unusable capacity.
///
/// Not recoverable: the owner must be reconstructed with a sane capacity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheCapacityError {
    /// The requested capacity exceeds [`MAX_PARTITION_CAPACITY`]
    #[error("{kind} partition capacity {requested} exceeds the supported maximum")]
    TooLarge {
        /// Which partition was misconfigured
        kind: &'static str,
        /// The capacity that was requested
        requested: usize,
    },
}

/// Statistics for a single cache partition
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionStats {
    /// Number of entries currently in the partition
    pub entry_count: usize,

    /// Maximum number of entries (0 if the partition is disabled)
    pub capacity: usize,

    /// Number of cache hits
    pub hits: u64,

    /// Number of cache misses
    pub misses: u64,

    /// Number of entries evicted to make room
    pub evictions: u64,
}

impl PartitionStats {
    /// Calculate the partition hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Statistics for all three partitions
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Title partition statistics
    pub titles: PartitionStats,

    /// Subtitle partition statistics
    pub subtitles: PartitionStats,

    /// Artwork partition statistics
    pub artwork: PartitionStats,
}

/// One recency-ordered partition.
///
/// A partition constructed with capacity 0 holds no entries: every get is
/// a miss and every put is dropped.
struct Partition<T: Clone> {
    entries: Option<Mutex<LruCache<ItemId, T>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<T: Clone> Partition<T> {
    fn new(kind: &'static str, capacity: usize) -> Result<Self, CacheCapacityError> {
        if capacity > MAX_PARTITION_CAPACITY {
            return Err(CacheCapacityError::TooLarge {
                kind,
                requested: capacity,
            });
        }

        let entries = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));

        Ok(Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    fn get(&self, item: ItemId) -> Option<T> {
        let Some(entries) = self.entries.as_ref() else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        match entries.lock().get(&item).cloned() {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn put(&self, item: ItemId, value: T) {
        let Some(entries) = self.entries.as_ref() else {
            return;
        };

        // push reports the displaced pair; a displaced entry with a
        // different key is an eviction, the same key is an overwrite.
        if let Some((displaced, _)) = entries.lock().push(item, value) {
            if displaced != item {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn remove(&self, item: ItemId) {
        if let Some(entries) = self.entries.as_ref() {
            entries.lock().pop(&item);
        }
    }

    fn clear(&self) {
        if let Some(entries) = self.entries.as_ref() {
            entries.lock().clear();
        }
    }

    fn stats(&self) -> PartitionStats {
        PartitionStats {
            entry_count: self.entries.as_ref().map_or(0, |e| e.lock().len()),
            capacity: self.entries.as_ref().map_or(0, |e| e.lock().cap().get()),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// LRU-evicting library item cache
///
/// Thread-safe cache with three independent partitions, one per displayable
/// attribute. Each partition is a strict LRU map with O(1) amortized get
/// and put; when a partition is at capacity, inserting evicts the single
/// least recently used entry of the *same* attribute kind.
///
/// # Example
///
/// ```
/// use medley_cache::{LibraryItemCache, LruLibraryItemCache};
///
/// let cache = LruLibraryItemCache::new(100, 100, 50).unwrap();
///
/// cache.store_title(1, "Blue Train".to_string());
/// assert_eq!(cache.title(1), Some("Blue Train".to_string()));
/// assert_eq!(cache.title(2), None);
///
/// let stats = cache.stats();
/// assert_eq!(stats.titles.hits, 1);
/// assert_eq!(stats.titles.misses, 1);
/// ```
pub struct LruLibraryItemCache {
    titles: Partition<String>,
    subtitles: Partition<String>,
    artwork: Partition<Arc<Artwork>>,
}

impl LruLibraryItemCache {
    /// Create a cache with the supplied per-partition capacities (entries).
    ///
    /// A capacity of 0 disables caching for that attribute kind: every get
    /// misses and every put is dropped. Capacities are fixed for the
    /// lifetime of the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheCapacityError`] if any capacity exceeds
    /// [`MAX_PARTITION_CAPACITY`].
    pub fn new(
        title_capacity: usize,
        subtitle_capacity: usize,
        artwork_capacity: usize,
    ) -> Result<Self, CacheCapacityError> {
        Ok(Self {
            titles: Partition::new("title", title_capacity)?,
            subtitles: Partition::new("subtitle", subtitle_capacity)?,
            artwork: Partition::new("artwork", artwork_capacity)?,
        })
    }

    /// Get current statistics for all three partitions
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            titles: self.titles.stats(),
            subtitles: self.subtitles.stats(),
            artwork: self.artwork.stats(),
        }
    }
}

impl LibraryItemCache for LruLibraryItemCache {
    fn title(&self, item: ItemId) -> Option<String> {
        self.titles.get(item)
    }

    fn store_title(&self, item: ItemId, title: String) {
        self.titles.put(item, title);
    }

    fn remove_title(&self, item: ItemId) {
        self.titles.remove(item);
    }

    fn clear_titles(&self) {
        self.titles.clear();
    }

    fn subtitle(&self, item: ItemId) -> Option<String> {
        self.subtitles.get(item)
    }

    fn store_subtitle(&self, item: ItemId, subtitle: String) {
        self.subtitles.put(item, subtitle);
    }

    fn remove_subtitle(&self, item: ItemId) {
        self.subtitles.remove(item);
    }

    fn clear_subtitles(&self) {
        self.subtitles.clear();
    }

    fn artwork(&self, item: ItemId) -> Option<Arc<Artwork>> {
        self.artwork.get(item)
    }

    fn store_artwork(&self, item: ItemId, artwork: Arc<Artwork>) {
        self.artwork.put(item, artwork);
    }

    fn remove_artwork(&self, item: ItemId) {
        self.artwork.remove(item);
    }

    fn clear_artwork(&self) {
        self.artwork.clear();
    }
}
