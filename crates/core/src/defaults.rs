//! Displayable default values
//!
//! Fallback values shown while an attribute is still being computed, or
//! permanently when computation fails or an item has no value for the
//! attribute. Every default is optional; an absent default simply clears
//! the target.

use crate::artwork::Artwork;
use std::sync::Arc;

/// Immutable fallback values for the three displayable attributes.
#[derive(Debug, Clone, Default)]
pub struct DisplayableDefaults {
    title: Option<String>,
    subtitle: Option<String>,
    artwork: Option<Arc<Artwork>>,
}

impl DisplayableDefaults {
    /// Create defaults from the supplied values, each of which may be absent.
    ///
    /// # Arguments
    ///
    /// * `title` - the default title, `None` allowed
    /// * `subtitle` - the default subtitle, `None` allowed
    /// * `artwork` - the default artwork, `None` allowed
    pub fn new(
        title: Option<String>,
        subtitle: Option<String>,
        artwork: Option<Arc<Artwork>>,
    ) -> Self {
        Self {
            title,
            subtitle,
            artwork,
        }
    }

    /// Defaults with every value absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default title, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The default subtitle, if any
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// The default artwork, if any
    pub fn artwork(&self) -> Option<Arc<Artwork>> {
        self.artwork.clone()
    }
}
