//! Medley Binder Library
//!
//! Asynchronous data binding for library item lists. A binder takes a
//! target view and a library item, resolves the displayable value for its
//! attribute (from the shared cache when possible, by background
//! computation otherwise), and applies it to the view while guaranteeing
//! that a recycled row never ends up showing a value from an item it was
//! previously bound to.
//!
//! Threading model: `bind` and `poll` belong to the single rendering
//! thread; computations run on a bounded pool of background workers;
//! completed results travel back through a queue that `poll` drains, so
//! views are only ever mutated from the rendering thread.
//!
//! # Example
//!
//! ```no_run
//! use medley_binder::{DataBinder, TitleBinder, TextTarget};
//! use medley_cache::LruLibraryItemCache;
//! use medley_core::DisplayableDefaults;
//! use std::sync::Arc;
//!
//! # fn demo<V: TextTarget>(row_title: V, item: Arc<dyn medley_core::LibraryItem>) {
//! let cache = Arc::new(LruLibraryItemCache::new(1000, 1000, 100).unwrap());
//! let defaults = Arc::new(DisplayableDefaults::new(
//!     Some("Untitled".to_string()),
//!     None,
//!     None,
//! ));
//!
//! let binder = TitleBinder::new(cache, defaults);
//!
//! // On the rendering thread, as rows scroll into view:
//! binder.bind(&row_title, item);
//!
//! // Once per frame, still on the rendering thread:
//! binder.poll();
//! # }
//! ```

mod binders;
mod engine;
mod pool;
mod target;

pub use binders::{ArtworkBinder, SubtitleBinder, TitleBinder};
pub use engine::{BindEngine, BindProfile, DataBinder};
pub use pool::BinderConfig;
pub use target::{BindTarget, ImageTarget, TextTarget, ViewId};
