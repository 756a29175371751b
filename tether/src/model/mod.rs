//! Observable value holders.
//!
//! A [`Model<T>`] holds one value, an enabled flag and the ids of the
//! validation errors that currently apply. Every mutation goes through the
//! same shape: compare the old and new state, assign if they differ, then
//! run one notification pass over the subscribed listeners, skipping the
//! listener named as the change's origin.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use tether::model::StringModel;
//!
//! let model = StringModel::default();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! let origin = model.add_listener(|_| {});
//! model.add_listener(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! model.set_from(Some("hello".to_string()), origin);
//! model.set(Some("hello".to_string())); // equal, no pass
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```
//!
//! # Re-entrancy
//!
//! A listener may write to the model it is being notified about. The write
//! is applied at once, but its notification pass is queued and runs after
//! the current pass has finished. Passes never nest.

mod any;
mod constraint;
mod list;
mod listener;

pub use any::{AnyCallback, AnyModel};
pub use constraint::{FIELD_MUST_BE_FILLED_IN, Filled, INVALID_EMAIL, PATTERN_MISMATCH};
pub use list::ListState;
pub use listener::ListenerId;

pub(crate) use listener::Listeners;

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use chrono::NaiveDate;

use crate::bean::Disposable;
use constraint::Constraint;

/// A model holding optional text.
pub type StringModel = Model<Option<String>>;
/// A model holding an optional integer.
pub type IntegerModel = Model<Option<i64>>;
/// A model holding an optional floating point number.
pub type DoubleModel = Model<Option<f64>>;
/// A model holding an optional calendar date.
pub type DateModel = Model<Option<NaiveDate>>;
/// A model holding an optional file system path.
pub type FileModel = Model<Option<PathBuf>>;
/// A model holding a flag.
pub type BooleanModel = Model<bool>;
/// A model holding a list of items and the selection within it.
pub type ListModel<T> = Model<ListState<T>>;

/// Callback invoked after a model changed.
pub type ChangeCallback<T> = dyn Fn(&Model<T>) + Send + Sync;

/// Unique identifier of a model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(usize);

impl ModelId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__model_{}", self.0)
    }
}

struct ModelState<T> {
    value: T,
    enabled: bool,
    error_ids: Vec<String>,
}

/// Pending notification passes. `notifying` is set while a pass runs.
#[derive(Default)]
struct Dispatch {
    notifying: bool,
    pending: VecDeque<Option<ListenerId>>,
}

struct ModelInner<T> {
    id: ModelId,
    state: RwLock<ModelState<T>>,
    listeners: Listeners<ChangeCallback<T>>,
    constraints: RwLock<Vec<Constraint<T>>>,
    dispatch: Mutex<Dispatch>,
}

/// Observable holder of a single value.
///
/// `Model<T>` is a shared handle: clones refer to the same value and the
/// same listeners. All locks are released before listeners run, so
/// listeners may read and write the model they are notified about.
pub struct Model<T> {
    inner: Arc<ModelInner<T>>,
}

impl<T> Model<T> {
    /// Create an enabled model with the given value and no errors.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(ModelInner {
                id: ModelId::new(),
                state: RwLock::new(ModelState {
                    value,
                    enabled: true,
                    error_ids: Vec::new(),
                }),
                listeners: Listeners::new(),
                constraints: RwLock::new(Vec::new()),
                dispatch: Mutex::new(Dispatch::default()),
            }),
        }
    }

    /// Get the unique ID of this model.
    pub fn id(&self) -> ModelId {
        self.inner.id
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.read_state(|state| f(&state.value))
    }

    fn read_state<R>(&self, f: impl FnOnce(&ModelState<T>) -> R) -> R {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Check whether bound widgets should accept edits.
    pub fn is_enabled(&self) -> bool {
        self.read_state(|state| state.enabled)
    }

    /// Get the ids of the validation errors that currently apply.
    pub fn error_ids(&self) -> Vec<String> {
        self.read_state(|state| state.error_ids.clone())
    }

    /// Check whether any validation error applies.
    pub fn has_errors(&self) -> bool {
        self.read_state(|state| !state.error_ids.is_empty())
    }

    /// Subscribe to changes. Returns the handle used to unsubscribe or to
    /// name this listener as the origin of a write.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Model<T>) + Send + Sync + 'static,
    {
        self.inner.listeners.add(Arc::new(listener))
    }

    /// Unsubscribe a listener. Returns false if it was not subscribed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Check whether a listener is currently subscribed.
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.contains(id)
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Subscribe and get a guard that unsubscribes when closed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<T>
    where
        F: Fn(&Model<T>) + Send + Sync + 'static,
    {
        let id = self.add_listener(listener);
        Subscription {
            model: self.downgrade(),
            id: Some(id),
        }
    }

    /// Create a weak handle that does not keep the model alive.
    pub fn downgrade(&self) -> WeakModel<T> {
        WeakModel {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Enable or disable the model.
    ///
    /// Follows the compare-assign-notify shape: nothing happens when the
    /// flag already has the requested value.
    pub fn set_enabled(&self, enabled: bool, source: Option<ListenerId>) -> bool {
        let changed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let changed = guard.enabled != enabled;
            guard.enabled = enabled;
            changed
        };
        if changed {
            self.notify(source);
        }
        changed
    }

    /// Replace the validation error ids.
    ///
    /// Duplicate ids are dropped, the first occurrence wins.
    pub fn set_error_ids(&self, ids: Vec<String>, source: Option<ListenerId>) -> bool {
        let mut unique: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        let changed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if guard.error_ids == unique {
                false
            } else {
                guard.error_ids = unique;
                true
            }
        };
        if changed {
            self.notify(source);
        }
        changed
    }

    /// Append one validation error id.
    pub fn add_error_id(&self, id: impl Into<String>) -> bool {
        let mut ids = self.error_ids();
        ids.push(id.into());
        self.set_error_ids(ids, None)
    }

    /// Remove all validation error ids.
    pub fn clear_error_ids(&self) -> bool {
        self.set_error_ids(Vec::new(), None)
    }

    /// Recompute the error ids from the declared constraints.
    ///
    /// Listeners are notified when the set of errors changed. Returns true
    /// when the model is valid.
    pub fn validate(&self) -> bool {
        let ids: Vec<String> = {
            let constraints = self
                .inner
                .constraints
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            self.with(|value| {
                constraints
                    .iter()
                    .filter(|constraint| !constraint.is_satisfied_by(value))
                    .map(|constraint| constraint.error_id().to_string())
                    .collect()
            })
        };
        log::trace!("Validated {}: {:?}", self.inner.id, ids);
        let valid = ids.is_empty();
        self.set_error_ids(ids, None);
        valid
    }

    /// Declare a validation rule. `check` returns true when the value is
    /// acceptable; otherwise `error_id` is reported by [`Model::validate`].
    pub fn constraint<F>(self, error_id: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push_constraint(Constraint::new(error_id, check));
        self
    }

    fn push_constraint(&self, constraint: Constraint<T>) {
        let mut guard = self
            .inner
            .constraints
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.retain(|existing| existing.error_id() != constraint.error_id());
        guard.push(constraint);
    }

    fn drop_constraint(&self, error_id: &str) {
        let mut guard = self
            .inner
            .constraints
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.retain(|existing| existing.error_id() != error_id);
    }

    /// Run one notification pass, or queue it when a pass is running.
    fn notify(&self, source: Option<ListenerId>) {
        {
            let mut dispatch = self
                .inner
                .dispatch
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            dispatch.pending.push_back(source);
            if dispatch.notifying {
                log::trace!("Queued re-entrant notification for {}", self.inner.id);
                return;
            }
            dispatch.notifying = true;
        }

        loop {
            let origin = {
                let mut dispatch = self
                    .inner
                    .dispatch
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                match dispatch.pending.pop_front() {
                    Some(origin) => origin,
                    None => {
                        dispatch.notifying = false;
                        break;
                    }
                }
            };
            let invoked = self.inner.listeners.dispatch(origin, |listener| listener(self));
            log::trace!(
                "Notified {} listener(s) of {} (origin: {:?})",
                invoked,
                self.inner.id,
                origin
            );
        }
    }
}

impl<T: PartialEq> Model<T> {
    /// Set the value without naming an origin; every listener is notified.
    pub fn set(&self, value: T) -> bool {
        self.set_with_source(value, None)
    }

    /// Set the value on behalf of listener `source`, which is not notified.
    pub fn set_from(&self, value: T, source: ListenerId) -> bool {
        self.set_with_source(value, Some(source))
    }

    /// The single value mutator.
    ///
    /// Does nothing when `value` equals the current value. Otherwise
    /// assigns it and notifies every listener except `source`. Returns
    /// whether the value changed.
    pub fn set_with_source(&self, value: T, source: Option<ListenerId>) -> bool {
        let changed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if guard.value == value {
                false
            } else {
                guard.value = value;
                true
            }
        };
        if changed {
            self.notify(source);
        }
        changed
    }

    /// Modify a copy of the value and store it through [`Model::set_with_source`].
    pub fn update(&self, source: Option<ListenerId>, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let mut value = self.get();
        f(&mut value);
        self.set_with_source(value, source)
    }
}

impl<T: Filled + 'static> Model<T> {
    /// Require a value. When set, [`Model::validate`] reports
    /// [`FIELD_MUST_BE_FILLED_IN`] for values that are not [`Filled`].
    pub fn must_be_filled(self, must_be_filled: bool) -> Self {
        if must_be_filled {
            self.push_constraint(Constraint::new(FIELD_MUST_BE_FILLED_IN, T::is_filled));
        } else {
            self.drop_constraint(FIELD_MUST_BE_FILLED_IN);
        }
        self
    }
}

impl<T: Clone + Send + Sync + 'static> Model<T> {
    /// Create a model that pushes every new value into `updater`.
    pub fn with_updater<F>(initial: T, updater: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let model = Self::new(initial);
        model.add_listener(move |model| updater(model.get()));
        model
    }
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Model<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Model")
            .field("id", &self.inner.id)
            .field("value", &state.value)
            .field("enabled", &state.enabled)
            .field("error_ids", &state.error_ids)
            .field("listeners", &self.inner.listeners)
            .finish()
    }
}

/// Weak handle to a [`Model`].
pub struct WeakModel<T> {
    inner: Weak<ModelInner<T>>,
}

impl<T> WeakModel<T> {
    /// Get a strong handle if the model is still alive.
    pub fn upgrade(&self) -> Option<Model<T>> {
        self.inner.upgrade().map(|inner| Model { inner })
    }
}

impl<T> Clone for WeakModel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// A listener registration that can be disposed.
///
/// Returned by [`Model::subscribe`]. Closing it removes the listener; the
/// guard only holds a weak reference to the model.
pub struct Subscription<T> {
    model: WeakModel<T>,
    id: Option<ListenerId>,
}

impl<T> Subscription<T> {
    /// Handle of the subscribed listener, `None` once closed.
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }
}

impl<T> Disposable for Subscription<T> {
    fn close(&mut self) {
        if let Some(id) = self.id.take()
            && let Some(model) = self.model.upgrade()
        {
            model.remove_listener(id);
        }
    }
}
