//! Medley Core Library
//!
//! Data model for the media library UI: library items, decoded artwork,
//! displayable defaults, and the shared error types.

pub mod artwork;
pub mod defaults;
pub mod error;
pub mod item;

pub use artwork::Artwork;
pub use defaults::DisplayableDefaults;
pub use error::LibraryReadError;
pub use item::{ArtworkSource, ItemId, LibraryItem};
