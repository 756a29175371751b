//! Check box and radio button bound to a boolean model.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{Bean, BeanState, Disposable, Lifecycle, RenderGuard};
use crate::error::BeanError;
use crate::model::{BooleanModel, ListenerId, WeakModel};
use crate::widgets::{ToggleButton, ToggleKind, Widget};

#[derive(Default)]
struct Binding {
    rendering: AtomicBool,
    listener: Mutex<Option<ListenerId>>,
}

impl Binding {
    fn render(&self, model: &BooleanModel, toggle: &ToggleButton) {
        {
            let _rendering = RenderGuard::enter(&self.rendering);
            toggle.set_checked(model.get());
        }
        toggle.set_enabled(model.is_enabled());
    }

    fn toggled(&self, model: &BooleanModel, toggle: &ToggleButton) {
        if self.rendering.load(Ordering::SeqCst) {
            return;
        }
        let origin = *self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        model.set_with_source(toggle.is_checked(), origin);
    }
}

/// A [`ToggleButton`] bound to a [`BooleanModel`].
pub struct ToggleBean {
    model: BooleanModel,
    toggle: ToggleButton,
    binding: Arc<Binding>,
    lifecycle: Lifecycle,
    model_listener: Option<ListenerId>,
    toggle_callback: Option<ListenerId>,
}

impl ToggleBean {
    pub fn new(model: BooleanModel, kind: ToggleKind, label: impl Into<String>) -> Self {
        let toggle = ToggleButton::new(kind, label);
        Self {
            lifecycle: Lifecycle::new(format!("toggle {}", toggle.id())),
            model,
            toggle,
            binding: Arc::new(Binding::default()),
            model_listener: None,
            toggle_callback: None,
        }
    }

    /// Create a bean showing a check box.
    pub fn check_box(model: BooleanModel, label: impl Into<String>) -> Self {
        Self::new(model, ToggleKind::CheckBox, label)
    }

    /// Create a bean showing a radio button.
    pub fn radio_button(model: BooleanModel, label: impl Into<String>) -> Self {
        Self::new(model, ToggleKind::RadioButton, label)
    }

    pub fn toggle(&self) -> &ToggleButton {
        &self.toggle
    }

    pub fn model(&self) -> &BooleanModel {
        &self.model
    }
}

impl Bean for ToggleBean {
    fn init_bean(&mut self) -> Result<(), BeanError> {
        self.lifecycle.activate()?;

        let binding = Arc::clone(&self.binding);
        let toggle = self.toggle.clone();
        let listener = self
            .model
            .add_listener(move |model| binding.render(model, &toggle));
        *self
            .binding
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(listener);
        self.model_listener = Some(listener);

        let binding = Arc::clone(&self.binding);
        let model: WeakModel<bool> = self.model.downgrade();
        self.toggle_callback = Some(self.toggle.on_change(move |toggle| {
            if let Some(model) = model.upgrade() {
                binding.toggled(&model, toggle);
            }
        }));

        self.binding.render(&self.model, &self.toggle);
        Ok(())
    }

    fn widget(&self) -> Widget {
        Widget::Toggle(self.toggle.clone())
    }

    fn state(&self) -> BeanState {
        self.lifecycle.state()
    }
}

impl Disposable for ToggleBean {
    fn close(&mut self) {
        if !self.lifecycle.close() {
            return;
        }
        if let Some(id) = self.model_listener.take() {
            self.model.remove_listener(id);
        }
        if let Some(id) = self.toggle_callback.take() {
            self.toggle.remove_on_change(id);
        }
    }
}

impl fmt::Debug for ToggleBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleBean")
            .field("toggle", &self.toggle.id())
            .field("model", &self.model.id())
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
