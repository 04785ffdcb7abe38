//! Bind target contracts
//!
//! A bind target is a handle to one slot of a rendering row (a text line
//! or an artwork slot). The binding subsystem writes into targets, never
//! reads from them. Target handles are cheap to clone and may travel to a
//! background worker inside a scheduled computation, but their setters are
//! only ever invoked from the rendering thread.

use medley_core::Artwork;
use std::sync::Arc;

/// Unique identity of a bind target.
///
/// Rows are recycled as the list scrolls, so the *identity* of a target,
/// not the item it currently shows, is what in-flight computations are
/// reconciled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Create a new unique view ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything a binder can write a displayable value into.
pub trait BindTarget {
    /// Stable identity of this target for the lifetime of the row
    fn view_id(&self) -> ViewId;
}

/// A target that displays a line of text (title or subtitle).
///
/// `set_text(None)` clears the target.
pub trait TextTarget: BindTarget + Clone + Send + 'static {
    /// Replace the displayed text
    fn set_text(&self, text: Option<&str>);
}

/// A target that displays a decoded artwork bitmap.
///
/// `set_artwork(None)` clears the target.
pub trait ImageTarget: BindTarget + Clone + Send + 'static {
    /// Replace the displayed artwork
    fn set_artwork(&self, artwork: Option<Arc<Artwork>>);
}
