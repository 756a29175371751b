//! Push button.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::WidgetId;
use crate::model::{ListenerId, Listeners};

type ClickCallback = dyn Fn(&Button) + Send + Sync;

#[derive(Debug)]
struct ButtonInner {
    label: String,
    enabled: bool,
}

/// A clickable button.
///
/// [`Button::click`] stands in for the user pressing it and runs the
/// callbacks registered with [`Button::on_click`], unless the button is
/// disabled.
#[derive(Debug)]
pub struct Button {
    id: WidgetId,
    inner: Arc<RwLock<ButtonInner>>,
    listeners: Arc<Listeners<ClickCallback>>,
    dirty: Arc<AtomicBool>,
}

impl Button {
    /// Create an enabled button with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            inner: Arc::new(RwLock::new(ButtonInner {
                label: label.into(),
                enabled: true,
            })),
            listeners: Arc::new(Listeners::new()),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Get the button label
    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.label.clone())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.read().map(|guard| guard.enabled).unwrap_or(false)
    }

    /// Set the button label
    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = label.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.enabled != enabled
        {
            guard.enabled = enabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Press the button. Returns false if it is disabled.
    pub fn click(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.listeners.dispatch(None, |callback| callback(self));
        true
    }

    /// Register a click callback
    pub fn on_click<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Button) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(callback))
    }

    pub fn remove_on_click(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn callback_count(&self) -> usize {
        self.listeners.len()
    }

    /// Check if the button state has changed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Button {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            listeners: Arc::clone(&self.listeners),
            dirty: Arc::clone(&self.dirty),
        }
    }
}
