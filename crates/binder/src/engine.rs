//! Bind engine
//!
//! The state machine shared by every binder: cache lookup, default
//! application, background scheduling, and reconciliation of completed
//! computations against the latest bind request for each view.
//!
//! Every bind request is stamped with a monotonically increasing sequence
//! number recorded against the target's [`ViewId`]; a completed computation
//! is applied only if its stamp still matches the view's latest recorded
//! stamp. `cancel_all` additionally bumps an epoch counter so that every
//! outstanding stamp becomes unmatchable at once.

use crate::pool::{BinderConfig, WorkerPool};
use crate::target::{BindTarget, ViewId};
use medley_core::{ItemId, LibraryItem, LibraryReadError};
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{trace, warn};

/// Asynchronous binder of one displayable attribute.
///
/// `bind` and `poll` must only be called from the rendering thread; the
/// trait is `Send + Sync` so a binder can be shared with the workers that
/// deliver results back to it.
pub trait DataBinder<V>: Send + Sync {
    /// Make `view` display the attribute value for `item`.
    ///
    /// Supersedes any earlier bind of the same view. On a cache hit the
    /// value is applied synchronously and no background work is scheduled;
    /// on a miss the displayable default is applied immediately and the
    /// real value is computed in the background.
    fn bind(&self, view: &V, item: Arc<dyn LibraryItem>);

    /// Cancel every in-flight computation owned by this binder and clear
    /// all view associations.
    ///
    /// Results of work that already started are discarded when they
    /// arrive; no view is mutated after this call returns. Cached values
    /// are not touched.
    fn cancel_all(&self);

    /// Apply completed computations to their views.
    ///
    /// Must be called from the rendering thread, typically once per frame.
    /// Results whose bind request has been superseded or cancelled are
    /// discarded here.
    fn poll(&self);

    /// Whether computations are still queued, running, or awaiting `poll`.
    fn has_pending_work(&self) -> bool;
}

/// The attribute-specific hooks a concrete binder plugs into the engine.
///
/// `cached`/`store`/`default_value` are non-blocking; `calculate` may be
/// slow and only ever runs on a background worker; `assign` only ever runs
/// on the rendering thread.
pub trait BindProfile: Send + Sync + 'static {
    /// The displayable value this profile produces
    type Value: Clone + Send + Sync + 'static;

    /// The target this profile writes into
    type View: BindTarget + Clone + Send + 'static;

    /// Attribute name used in log messages
    fn attribute(&self) -> &'static str;

    /// Look up a previously computed value, touching its recency
    fn cached(&self, item: ItemId) -> Option<Self::Value>;

    /// Store a freshly computed value
    fn store(&self, item: ItemId, value: Self::Value);

    /// The fallback value shown until the real value is available
    fn default_value(&self) -> Option<Self::Value>;

    /// Compute the real value for an item (slow path)
    fn calculate(&self, item: &dyn LibraryItem) -> Result<Option<Self::Value>, LibraryReadError>;

    /// Write a value (or clear, for `None`) into the target
    fn assign(&self, view: &Self::View, value: Option<&Self::Value>);
}

/// The latest bind request recorded for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    item: ItemId,
    seq: u64,
}

/// A finished background computation waiting to be applied.
struct Completion<V, T> {
    view: V,
    view_id: ViewId,
    item: ItemId,
    seq: u64,
    epoch: u64,
    result: Result<Option<T>, LibraryReadError>,
}

/// State shared between the rendering thread and the workers.
struct EngineShared<V, T> {
    /// Latest (item, sequence) association per view
    bindings: Mutex<HashMap<ViewId, Binding>>,

    /// Finished computations not yet applied
    completions: Mutex<VecDeque<Completion<V, T>>>,

    /// Stamp source for bind requests
    seq: AtomicU64,

    /// Bumped by `cancel_all`; completions from older epochs are void
    epoch: AtomicU64,

    /// Computations queued or running (excludes queued completions)
    in_flight: AtomicUsize,
}

impl<V, T> EngineShared<V, T> {
    /// Whether a stamped request is still the view's latest association.
    fn is_current(&self, epoch: u64, view_id: ViewId, item: ItemId, seq: u64) -> bool {
        if self.epoch.load(Ordering::Acquire) != epoch {
            return false;
        }

        self.bindings
            .lock()
            .unwrap()
            .get(&view_id)
            .is_some_and(|binding| binding.item == item && binding.seq == seq)
    }
}

/// Generic bind engine driven by a [`BindProfile`].
///
/// Owns the binder's worker pool and all per-view bookkeeping. Concrete
/// binders are thin wrappers that pair this engine with their profile.
pub struct BindEngine<P: BindProfile> {
    profile: Arc<P>,
    shared: Arc<EngineShared<P::View, P::Value>>,
    pool: WorkerPool,
}

impl<P: BindProfile> BindEngine<P> {
    /// Create an engine around a profile with the supplied configuration.
    pub fn new(profile: P, config: BinderConfig) -> Self {
        Self {
            profile: Arc::new(profile),
            shared: Arc::new(EngineShared {
                bindings: Mutex::new(HashMap::new()),
                completions: Mutex::new(VecDeque::new()),
                seq: AtomicU64::new(0),
                epoch: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
            }),
            pool: WorkerPool::new(&config),
        }
    }

    /// See [`DataBinder::bind`].
    pub fn bind(&self, view: &P::View, item: Arc<dyn LibraryItem>) {
        let view_id = view.view_id();
        let item_id = item.id();
        let seq = self.shared.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let epoch = self.shared.epoch.load(Ordering::Acquire);

        self.shared
            .bindings
            .lock()
            .unwrap()
            .insert(view_id, Binding { item: item_id, seq });

        // Fast path: a cached value is applied synchronously and nothing
        // is scheduled.
        if let Some(value) = self.profile.cached(item_id) {
            self.profile.assign(view, Some(&value));
            return;
        }

        // The row must never show leftover content from a previous item,
        // so the default goes in before the slow path starts.
        self.profile.assign(view, self.profile.default_value().as_ref());

        let profile = Arc::clone(&self.profile);
        let shared = Arc::clone(&self.shared);
        let view = view.clone();
        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);

        self.pool.submit(Box::new(move || {
            // Early discard: superseded or cancelled while queued. The
            // authoritative check happens again on the rendering thread.
            if !shared.is_current(epoch, view_id, item_id, seq) {
                trace!(
                    attribute = profile.attribute(),
                    item = item_id,
                    "skipping computation for superseded bind request"
                );
                shared.in_flight.fetch_sub(1, Ordering::AcqRel);
                return;
            }

            let result = profile.calculate(item.as_ref());

            shared.completions.lock().unwrap().push_back(Completion {
                view,
                view_id,
                item: item_id,
                seq,
                epoch,
                result,
            });
            shared.in_flight.fetch_sub(1, Ordering::AcqRel);
        }));
    }

    /// See [`DataBinder::cancel_all`].
    pub fn cancel_all(&self) {
        // Void every outstanding stamp first so running computations see
        // the cancellation as early as possible.
        self.shared.epoch.fetch_add(1, Ordering::AcqRel);
        self.shared.bindings.lock().unwrap().clear();

        let dropped = self.pool.cancel_pending();
        if dropped > 0 {
            self.shared.in_flight.fetch_sub(dropped, Ordering::AcqRel);
        }

        self.shared.completions.lock().unwrap().clear();
    }

    /// See [`DataBinder::poll`].
    pub fn poll(&self) {
        loop {
            let completion = self.shared.completions.lock().unwrap().pop_front();
            let Some(completion) = completion else {
                break;
            };

            if !self.shared.is_current(
                completion.epoch,
                completion.view_id,
                completion.item,
                completion.seq,
            ) {
                // Stale or cancelled: never an error.
                trace!(
                    attribute = self.profile.attribute(),
                    item = completion.item,
                    "discarding stale result"
                );
                continue;
            }

            match completion.result {
                Ok(Some(value)) => {
                    self.profile.store(completion.item, value.clone());
                    self.profile.assign(&completion.view, Some(&value));
                }
                Ok(None) => {
                    // The item has no value for this attribute; the
                    // default applied at bind time stays.
                }
                Err(error) => {
                    warn!(
                        attribute = self.profile.attribute(),
                        item = completion.item,
                        error = %error,
                        "attribute computation failed, keeping default"
                    );
                }
            }
        }
    }

    /// See [`DataBinder::has_pending_work`].
    pub fn has_pending_work(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire) > 0
            || !self.shared.completions.lock().unwrap().is_empty()
    }
}

impl<P: BindProfile> DataBinder<P::View> for BindEngine<P> {
    fn bind(&self, view: &P::View, item: Arc<dyn LibraryItem>) {
        BindEngine::bind(self, view, item);
    }

    fn cancel_all(&self) {
        BindEngine::cancel_all(self);
    }

    fn poll(&self) {
        BindEngine::poll(self);
    }

    fn has_pending_work(&self) -> bool {
        BindEngine::has_pending_work(self)
    }
}
