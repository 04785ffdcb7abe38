//! Medley Body Library
//!
//! The presenter-facing list component: holds the item list, forwards each
//! visible row's targets to the three data binders, and hosts the observer
//! registries for selection and scroll events. All of it runs on the
//! rendering thread; the heavy lifting lives in `medley-binder`.

mod list_body;
mod listeners;

pub use list_body::{ListBody, RowViews};
pub use listeners::{
    ItemSelectedListener, ListenerHandle, ListenerRegistry, MenuItemId, MenuItemSelectedListener,
    TopReachedListener,
};
