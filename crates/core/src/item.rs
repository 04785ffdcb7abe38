//! Library item model
//!
//! A library item is one displayable media entry: a track, an album, a
//! playlist. Items carry a stable identity and expose the raw data each
//! displayable attribute is computed from. Items are immutable from the
//! binding subsystem's perspective.

use crate::error::LibraryReadError;
use std::path::PathBuf;
use std::sync::Arc;

/// Unique library item identifier
///
/// Stable for the lifetime of the item; used as the cache key for every
/// displayable attribute.
pub type ItemId = u64;

/// Where raw artwork bytes come from.
///
/// Items that fetch artwork over the network are expected to resolve the
/// fetch themselves and hand back `Encoded` bytes; the binding subsystem
/// only decodes.
#[derive(Debug, Clone)]
pub enum ArtworkSource {
    /// Encoded image bytes already in memory (PNG, JPEG, ...)
    Encoded(Arc<[u8]>),

    /// Path to an encoded image file on disk
    File(PathBuf),
}

/// A displayable media entry in the library.
///
/// Accessors may be slow (they are only ever called from background
/// workers) and may fail. A failed accessor surfaces as a
/// [`LibraryReadError`] and results in the displayable default being shown;
/// it never propagates as a panic.
///
/// Returning `Ok(None)` means the item genuinely has no value for that
/// attribute, which is distinct from a read failure.
pub trait LibraryItem: Send + Sync {
    /// Stable identity of this item
    fn id(&self) -> ItemId;

    /// The item's title text
    fn title(&self) -> Result<Option<String>, LibraryReadError>;

    /// The item's subtitle text
    fn subtitle(&self) -> Result<Option<String>, LibraryReadError>;

    /// The raw artwork for this item, if any
    fn artwork(&self) -> Result<Option<ArtworkSource>, LibraryReadError>;
}
