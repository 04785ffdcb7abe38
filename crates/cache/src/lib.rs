//! Medley Cache Library
//!
//! Bounded, thread-safe storage for previously computed displayable values
//! (titles, subtitles, artwork) with per-attribute LRU eviction.

mod lru_cache;

pub use lru_cache::{
    CacheCapacityError, CacheStats, LruLibraryItemCache, PartitionStats, MAX_PARTITION_CAPACITY,
};

use medley_core::{Artwork, ItemId};
use std::sync::Arc;

/// A store of previously computed displayable values, keyed by item identity.
///
/// One partition per attribute kind. Looking a value up marks it most
/// recently used. Every operation must be safe to call concurrently from
/// any thread: binders read on the rendering thread and write results back
/// from background workers.
pub trait LibraryItemCache: Send + Sync {
    /// Get the cached title for an item, touching its recency
    fn title(&self, item: ItemId) -> Option<String>;

    /// Insert or overwrite the cached title for an item
    fn store_title(&self, item: ItemId, title: String);

    /// Remove the cached title for an item
    fn remove_title(&self, item: ItemId);

    /// Remove all cached titles
    fn clear_titles(&self);

    /// Get the cached subtitle for an item, touching its recency
    fn subtitle(&self, item: ItemId) -> Option<String>;

    /// Insert or overwrite the cached subtitle for an item
    fn store_subtitle(&self, item: ItemId, subtitle: String);

    /// Remove the cached subtitle for an item
    fn remove_subtitle(&self, item: ItemId);

    /// Remove all cached subtitles
    fn clear_subtitles(&self);

    /// Get the cached artwork for an item, touching its recency
    fn artwork(&self, item: ItemId) -> Option<Arc<Artwork>>;

    /// Insert or overwrite the cached artwork for an item
    fn store_artwork(&self, item: ItemId, artwork: Arc<Artwork>);

    /// Remove the cached artwork for an item
    fn remove_artwork(&self, item: ItemId);

    /// Remove all cached artwork
    fn clear_artwork(&self);

    /// Remove every cached value from every partition
    fn clear(&self) {
        self.clear_titles();
        self.clear_subtitles();
        self.clear_artwork();
    }
}
