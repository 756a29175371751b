//! Type-erased access to a model.
//!
//! Decorators and form validators do not care about a model's value type.
//! They see models through [`AnyModel`], which exposes the enabled flag, the
//! error ids and change notification.

use std::sync::Arc;

use super::{ListenerId, Model, ModelId};

/// Callback for [`AnyModel::observe`].
pub type AnyCallback = dyn Fn(&dyn AnyModel) + Send + Sync;

/// Object-safe view of a [`Model`] without its value type.
pub trait AnyModel: Send + Sync {
    /// Unique id of the model.
    fn model_id(&self) -> ModelId;

    /// Whether bound widgets should accept edits.
    fn is_enabled(&self) -> bool;

    /// Ids of the validation errors that currently apply.
    fn error_ids(&self) -> Vec<String>;

    /// Recompute the error ids from the declared constraints.
    fn validate(&self) -> bool;

    /// Subscribe to changes of any kind.
    fn observe(&self, listener: Arc<AnyCallback>) -> ListenerId;

    /// Remove a listener registered with [`AnyModel::observe`].
    fn unobserve(&self, id: ListenerId) -> bool;
}

impl<T: Send + Sync + 'static> AnyModel for Model<T> {
    fn model_id(&self) -> ModelId {
        self.id()
    }

    fn is_enabled(&self) -> bool {
        Model::is_enabled(self)
    }

    fn error_ids(&self) -> Vec<String> {
        Model::error_ids(self)
    }

    fn validate(&self) -> bool {
        Model::validate(self)
    }

    fn observe(&self, listener: Arc<AnyCallback>) -> ListenerId {
        self.add_listener(move |model: &Model<T>| listener(model))
    }

    fn unobserve(&self, id: ListenerId) -> bool {
        self.remove_listener(id)
    }
}
