//! List body
//!
//! Binds visible rows to items through the three data binders and raises
//! selection/scroll events to registered listeners. Rows are recycled by
//! the host UI: rebinding a row to another item is just a later
//! `bind_row` call, which the binders treat as superseding the old one.

use crate::listeners::{
    ItemSelectedListener, ListenerHandle, ListenerRegistry, MenuItemId, MenuItemSelectedListener,
    TopReachedListener,
};
use medley_binder::{DataBinder, ImageTarget, TextTarget};
use medley_core::LibraryItem;
use std::sync::Arc;
use tracing::warn;

/// The bindable targets of one rendering row.
pub struct RowViews<T: TextTarget, A: ImageTarget> {
    /// Target for the item title
    pub title: T,

    /// Target for the item subtitle
    pub subtitle: T,

    /// Target for the item artwork
    pub artwork: A,
}

impl<T: TextTarget, A: ImageTarget> RowViews<T, A> {
    /// Bundle a row's three targets
    pub fn new(title: T, subtitle: T, artwork: A) -> Self {
        Self {
            title,
            subtitle,
            artwork,
        }
    }
}

/// Presenter-facing list component.
///
/// Owns the displayed items and the three binders. The host UI calls
/// [`bind_row`](Self::bind_row) for each row scrolled into view (and again
/// whenever a row is recycled for a different index), and
/// [`pump`](Self::pump) once per frame so completed background
/// computations reach their rows. Everything here must be called from the
/// rendering thread.
pub struct ListBody<T: TextTarget, A: ImageTarget> {
    items: Vec<Arc<dyn LibraryItem>>,
    title_binder: Option<Box<dyn DataBinder<T>>>,
    subtitle_binder: Option<Box<dyn DataBinder<T>>>,
    artwork_binder: Option<Box<dyn DataBinder<A>>>,
    top_reached: ListenerRegistry<TopReachedListener>,
    item_selected: ListenerRegistry<ItemSelectedListener>,
    menu_item_selected: ListenerRegistry<MenuItemSelectedListener>,
}

impl<T: TextTarget, A: ImageTarget> ListBody<T, A> {
    /// Create an empty body with no binders installed
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            title_binder: None,
            subtitle_binder: None,
            artwork_binder: None,
            top_reached: ListenerRegistry::new(),
            item_selected: ListenerRegistry::new(),
            menu_item_selected: ListenerRegistry::new(),
        }
    }

    /// The items currently displayed
    pub fn items(&self) -> &[Arc<dyn LibraryItem>] {
        &self.items
    }

    /// Number of items currently displayed
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Replace the displayed items.
    ///
    /// The host UI is expected to rebind its visible rows afterwards.
    pub fn set_items(&mut self, items: Vec<Arc<dyn LibraryItem>>) {
        self.items = items;
    }

    /// Install the binder used for titles.
    ///
    /// The binder being replaced, if any, is cancelled first so none of
    /// its in-flight work can reach a row.
    pub fn set_title_binder(&mut self, binder: Box<dyn DataBinder<T>>) {
        if let Some(old) = self.title_binder.replace(binder) {
            old.cancel_all();
        }
    }

    /// Install the binder used for subtitles.
    pub fn set_subtitle_binder(&mut self, binder: Box<dyn DataBinder<T>>) {
        if let Some(old) = self.subtitle_binder.replace(binder) {
            old.cancel_all();
        }
    }

    /// Install the binder used for artwork.
    pub fn set_artwork_binder(&mut self, binder: Box<dyn DataBinder<A>>) {
        if let Some(old) = self.artwork_binder.replace(binder) {
            old.cancel_all();
        }
    }

    /// Bind a row's targets to the item at `index`.
    ///
    /// Called when a row scrolls into view and again when the row is
    /// recycled for another index; the later call supersedes the earlier
    /// one in every binder.
    pub fn bind_row(&self, row: &RowViews<T, A>, index: usize) {
        let Some(item) = self.items.get(index) else {
            warn!(index, count = self.items.len(), "bind_row index out of range");
            return;
        };

        match &self.title_binder {
            Some(binder) => binder.bind(&row.title, item.clone()),
            None => warn!("No title binder set, could not bind title."),
        }

        match &self.subtitle_binder {
            Some(binder) => binder.bind(&row.subtitle, item.clone()),
            None => warn!("No subtitle binder set, could not bind subtitle."),
        }

        match &self.artwork_binder {
            Some(binder) => binder.bind(&row.artwork, item.clone()),
            None => warn!("No artwork binder set, could not bind artwork."),
        }
    }

    /// Deliver completed background computations to their rows.
    ///
    /// Call once per frame from the rendering thread.
    pub fn pump(&self) {
        if let Some(binder) = &self.title_binder {
            binder.poll();
        }
        if let Some(binder) = &self.subtitle_binder {
            binder.poll();
        }
        if let Some(binder) = &self.artwork_binder {
            binder.poll();
        }
    }

    /// Whether any binder still has queued or running computations
    pub fn has_pending_work(&self) -> bool {
        self.title_binder
            .as_ref()
            .is_some_and(|b| b.has_pending_work())
            || self
                .subtitle_binder
                .as_ref()
                .is_some_and(|b| b.has_pending_work())
            || self
                .artwork_binder
                .as_ref()
                .is_some_and(|b| b.has_pending_work())
    }

    /// Cancel all in-flight work in every binder (host teardown)
    pub fn cancel_all(&self) {
        if let Some(binder) = &self.title_binder {
            binder.cancel_all();
        }
        if let Some(binder) = &self.subtitle_binder {
            binder.cancel_all();
        }
        if let Some(binder) = &self.artwork_binder {
            binder.cancel_all();
        }
    }

    /// Register a listener for scrolled-to-top events
    pub fn add_top_reached_listener(&mut self, listener: TopReachedListener) -> ListenerHandle {
        self.top_reached.add(listener)
    }

    /// Unregister a scrolled-to-top listener
    pub fn remove_top_reached_listener(&mut self, handle: ListenerHandle) -> bool {
        self.top_reached.remove(handle)
    }

    /// Unregister every scrolled-to-top listener
    pub fn clear_top_reached_listeners(&mut self) {
        self.top_reached.clear();
    }

    /// Register a listener for item selection
    pub fn add_item_selected_listener(&mut self, listener: ItemSelectedListener) -> ListenerHandle {
        self.item_selected.add(listener)
    }

    /// Unregister an item selection listener
    pub fn remove_item_selected_listener(&mut self, handle: ListenerHandle) -> bool {
        self.item_selected.remove(handle)
    }

    /// Register a listener for contextual menu selections
    pub fn add_menu_item_selected_listener(
        &mut self,
        listener: MenuItemSelectedListener,
    ) -> ListenerHandle {
        self.menu_item_selected.add(listener)
    }

    /// Unregister a contextual menu selection listener
    pub fn remove_menu_item_selected_listener(&mut self, handle: ListenerHandle) -> bool {
        self.menu_item_selected.remove(handle)
    }

    /// Raise a scrolled-to-top event to every registered listener
    pub fn notify_top_reached(&self) {
        for listener in self.top_reached.iter() {
            listener();
        }
    }

    /// Raise an item selection event for the item at `index`
    pub fn notify_item_selected(&self, index: usize) {
        let Some(item) = self.items.get(index) else {
            warn!(index, count = self.items.len(), "selection index out of range");
            return;
        };

        for listener in self.item_selected.iter() {
            listener(item);
        }
    }

    /// Raise a contextual menu selection event for the item at `index`
    pub fn notify_menu_item_selected(&self, index: usize, menu_item: MenuItemId) {
        let Some(item) = self.items.get(index) else {
            warn!(index, count = self.items.len(), "selection index out of range");
            return;
        };

        for listener in self.menu_item_selected.iter() {
            listener(item, menu_item);
        }
    }
}

impl<T: TextTarget, A: ImageTarget> Default for ListBody<T, A> {
    fn default() -> Self {
        Self::new()
    }
}
