//! Read-only text.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::WidgetId;

#[derive(Debug)]
struct LabelInner {
    text: String,
    visible: bool,
}

/// A text label.
///
/// Counts how often its text was actually replaced, so callers can check
/// that redundant updates were skipped.
#[derive(Debug)]
pub struct Label {
    id: WidgetId,
    inner: Arc<RwLock<LabelInner>>,
    revisions: Arc<AtomicUsize>,
    dirty: Arc<AtomicBool>,
}

impl Label {
    /// Create a visible label
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            inner: Arc::new(RwLock::new(LabelInner {
                text: text.into(),
                visible: true,
            })),
            revisions: Arc::new(AtomicUsize::new(0)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn text(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.text.clone())
            .unwrap_or_default()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.read().map(|guard| guard.visible).unwrap_or(false)
    }

    /// Number of times the text was replaced by a different text
    pub fn revisions(&self) -> usize {
        self.revisions.load(Ordering::SeqCst)
    }

    /// Replace the text if it differs
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        if let Ok(mut guard) = self.inner.write()
            && guard.text != text
        {
            guard.text = text;
            self.revisions.fetch_add(1, Ordering::SeqCst);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_visible(&self, visible: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.visible != visible
        {
            guard.visible = visible;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Label {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            revisions: Arc::clone(&self.revisions),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}
