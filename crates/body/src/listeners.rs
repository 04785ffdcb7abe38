//! Observer registries
//!
//! Callbacks registered against the list body: scrolled-to-top, item
//! selected, contextual menu item selected. Registries are only touched
//! from the rendering thread, so they need no locking.

use medley_core::LibraryItem;
use std::sync::Arc;

/// Identifier of a contextual menu entry
pub type MenuItemId = u64;

/// Invoked when the list is scrolled back to the top
pub type TopReachedListener = Box<dyn Fn()>;

/// Invoked when an item row is selected
pub type ItemSelectedListener = Box<dyn Fn(&Arc<dyn LibraryItem>)>;

/// Invoked when an entry of an item's contextual menu is selected
pub type MenuItemSelectedListener = Box<dyn Fn(&Arc<dyn LibraryItem>, MenuItemId)>;

/// Handle returned when a listener is registered, used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// A registry of callbacks, notified in registration order.
pub struct ListenerRegistry<F> {
    listeners: Vec<(ListenerHandle, F)>,
    next_handle: u64,
}

impl<F> ListenerRegistry<F> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_handle: 0,
        }
    }

    /// Register a listener and return its handle
    pub fn add(&mut self, listener: F) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push((handle, listener));
        handle
    }

    /// Unregister a listener. Unknown handles are a no-op.
    ///
    /// Returns `true` if the listener was found and removed.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Unregister every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether the registry has no listeners
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Iterate over the registered listeners in registration order
    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.listeners.iter().map(|(_, listener)| listener)
    }
}

impl<F> Default for ListenerRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}
