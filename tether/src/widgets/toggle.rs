//! Check box and radio button.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::WidgetId;
use crate::model::{ListenerId, Listeners};

/// Which kind of toggle the widget shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleKind {
    /// Flips between checked and unchecked on every toggle.
    #[default]
    CheckBox,
    /// Becomes checked on toggle and stays checked.
    RadioButton,
}

type ChangeCallback = dyn Fn(&ToggleButton) + Send + Sync;

#[derive(Debug, Default)]
struct ToggleInner {
    checked: bool,
    label: String,
    enabled: bool,
}

/// A two-state button.
///
/// Changes of the checked state raise the callbacks registered with
/// [`ToggleButton::on_change`].
#[derive(Debug)]
pub struct ToggleButton {
    id: WidgetId,
    kind: ToggleKind,
    inner: Arc<RwLock<ToggleInner>>,
    listeners: Arc<Listeners<ChangeCallback>>,
    dirty: Arc<AtomicBool>,
}

impl ToggleButton {
    /// Create an unchecked toggle of the given kind
    pub fn new(kind: ToggleKind, label: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            kind,
            inner: Arc::new(RwLock::new(ToggleInner {
                checked: false,
                label: label.into(),
                enabled: true,
            })),
            listeners: Arc::new(Listeners::new()),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create an unchecked check box
    pub fn check_box(label: impl Into<String>) -> Self {
        Self::new(ToggleKind::CheckBox, label)
    }

    /// Create an unselected radio button
    pub fn radio_button(label: impl Into<String>) -> Self {
        Self::new(ToggleKind::RadioButton, label)
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> ToggleKind {
        self.kind
    }

    pub fn is_checked(&self) -> bool {
        self.inner.read().map(|guard| guard.checked).unwrap_or(false)
    }

    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.label.clone())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.read().map(|guard| guard.enabled).unwrap_or(false)
    }

    /// Set the checked state. Raises the callbacks if it changed.
    pub fn set_checked(&self, checked: bool) {
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.checked != checked => {
                guard.checked = checked;
                true
            }
            _ => false,
        };
        if changed {
            self.changed();
        }
    }

    /// User click. Ignored while disabled.
    pub fn toggle(&self) {
        if !self.is_enabled() {
            return;
        }
        match self.kind {
            ToggleKind::CheckBox => self.set_checked(!self.is_checked()),
            ToggleKind::RadioButton => self.set_checked(true),
        }
    }

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

    /// Register a callback raised after the checked state changed
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ToggleButton) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(callback))
    }

    pub fn remove_on_change(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn callback_count(&self) -> usize {
        self.listeners.len()
    }

    fn changed(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.listeners.dispatch(None, |callback| callback(self));
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for ToggleButton {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            inner: Arc::clone(&self.inner),
            listeners: Arc::clone(&self.listeners),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_box_flips() {
        let toggle = ToggleButton::check_box("x");
        toggle.toggle();
        assert!(toggle.is_checked());
        toggle.toggle();
        assert!(!toggle.is_checked());
    }

    #[test]
    fn test_radio_button_stays_checked() {
        let toggle = ToggleButton::radio_button("x");
        toggle.toggle();
        toggle.toggle();
        assert!(toggle.is_checked());
    }

    #[test]
    fn test_disabled_toggle_ignores_clicks() {
        let toggle = ToggleButton::check_box("x");
        toggle.set_enabled(false);
        toggle.toggle();
        assert!(!toggle.is_checked());
    }
}
