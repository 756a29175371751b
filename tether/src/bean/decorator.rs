//! Validation message display around any bean.

use std::fmt;
use std::sync::Arc;

use super::{Bean, BeanState, Disposable, Lifecycle};
use crate::error::BeanError;
use crate::model::{AnyModel, ListenerId};
use crate::text::TextResource;
use crate::widgets::{Label, Panel, Widget};

/// Wraps a bean and shows the model's validation errors next to it.
///
/// The decorator is a bean itself: initializing or closing it initializes
/// or closes the wrapped bean. Its widget is a row holding the wrapped
/// bean's widget and an error label. The label shows the localized error
/// messages joined by a space and is hidden while there are none.
pub struct ErrorMessageDecorator<B> {
    inner: B,
    model: Arc<dyn AnyModel>,
    resource: Arc<dyn TextResource>,
    label: Label,
    panel: Panel,
    lifecycle: Lifecycle,
    listener: Option<ListenerId>,
}

fn error_text(model: &dyn AnyModel, resource: &dyn TextResource) -> String {
    model
        .error_ids()
        .iter()
        .map(|id| resource.string(id))
        .collect::<Vec<_>>()
        .join(" ")
}

fn show_errors(label: &Label, model: &dyn AnyModel, resource: &dyn TextResource) {
    let text = error_text(model, resource);
    label.set_visible(!text.is_empty());
    label.set_text(text);
}

impl<B: Bean> ErrorMessageDecorator<B> {
    /// Decorate `inner`, which must be bound to `model`.
    pub fn new<M>(inner: B, model: &M, resource: Arc<dyn TextResource>) -> Self
    where
        M: AnyModel + Clone + 'static,
    {
        let label = Label::default();
        label.set_visible(false);
        let panel = Panel::row([inner.widget(), Widget::Label(label.clone())]);
        Self {
            lifecycle: Lifecycle::new(format!("decorator {}", panel.id())),
            inner,
            model: Arc::new(model.clone()),
            resource,
            label,
            panel,
            listener: None,
        }
    }

    /// The wrapped bean.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// The label showing the error messages.
    pub fn error_label(&self) -> &Label {
        &self.label
    }

    /// Current error text, empty when the model is valid.
    pub fn error_text(&self) -> String {
        self.label.text()
    }
}

impl<B: Bean> Bean for ErrorMessageDecorator<B> {
    fn init_bean(&mut self) -> Result<(), BeanError> {
        self.lifecycle.activate()?;

        let label = self.label.clone();
        let resource = Arc::clone(&self.resource);
        let listener = self.model.observe(Arc::new(move |model: &dyn AnyModel| {
            show_errors(&label, model, resource.as_ref());
        }));
        show_errors(&self.label, self.model.as_ref(), self.resource.as_ref());

        if let Err(err) = self.inner.init_bean() {
            self.model.unobserve(listener);
            self.lifecycle.rollback();
            return Err(err);
        }
        self.listener = Some(listener);
        Ok(())
    }

    fn widget(&self) -> Widget {
        Widget::Panel(self.panel.clone())
    }

    fn state(&self) -> BeanState {
        self.lifecycle.state()
    }
}

impl<B: Bean> Disposable for ErrorMessageDecorator<B> {
    fn close(&mut self) {
        if let Some(id) = self.listener.take() {
            self.model.unobserve(id);
        }
        self.lifecycle.close();
        self.inner.close();
    }
}

impl<B: Bean + fmt::Debug> fmt::Debug for ErrorMessageDecorator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMessageDecorator")
            .field("inner", &self.inner)
            .field("model", &self.model.model_id())
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
