//! Read-only display of a model.

use std::fmt;
use std::sync::Arc;

use super::{Bean, BeanState, Disposable, Lifecycle, TextCodec};
use crate::error::BeanError;
use crate::model::{ListenerId, Model};
use crate::widgets::{Label, Widget};

/// Shows a model's value in a [`Label`], formatted by a codec.
///
/// Only the model to widget direction exists; the codec's `parse` is never
/// used.
pub struct LabelBean<T, C> {
    model: Model<T>,
    label: Label,
    codec: Arc<C>,
    lifecycle: Lifecycle,
    model_listener: Option<ListenerId>,
}

impl<T, C> LabelBean<T, C>
where
    T: Send + Sync + 'static,
    C: TextCodec<T> + 'static,
{
    pub fn new(model: Model<T>, codec: C) -> Self {
        let label = Label::default();
        Self {
            lifecycle: Lifecycle::new(format!("label {}", label.id())),
            model,
            label,
            codec: Arc::new(codec),
            model_listener: None,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }
}

impl<T, C> Bean for LabelBean<T, C>
where
    T: Send + Sync + 'static,
    C: TextCodec<T> + 'static,
{
    fn init_bean(&mut self) -> Result<(), BeanError> {
        self.lifecycle.activate()?;
        self.label
            .set_text(self.model.with(|value| self.codec.format(value)));
        let codec = Arc::clone(&self.codec);
        let label = self.label.clone();
        self.model_listener = Some(
            self.model
                .add_listener(move |model| label.set_text(model.with(|value| codec.format(value)))),
        );
        Ok(())
    }

    fn widget(&self) -> Widget {
        Widget::Label(self.label.clone())
    }

    fn state(&self) -> BeanState {
        self.lifecycle.state()
    }
}

impl<T, C> Disposable for LabelBean<T, C> {
    fn close(&mut self) {
        if self.lifecycle.close()
            && let Some(id) = self.model_listener.take()
        {
            self.model.remove_listener(id);
        }
    }
}

impl<T, C> fmt::Debug for LabelBean<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelBean")
            .field("label", &self.label.id())
            .field("model", &self.model.id())
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
