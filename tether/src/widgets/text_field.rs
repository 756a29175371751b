//! Single and multi line text entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::WidgetId;
use crate::model::{ListenerId, Listeners};

/// Horizontal alignment of the text inside the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Text starts at the left edge.
    #[default]
    Left,
    /// Text ends at the right edge, used for numbers.
    Right,
}

/// Visual cue for the validity of the entered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldBorder {
    /// Normal border.
    #[default]
    Neutral,
    /// The text could not be parsed.
    Invalid,
}

type ChangeCallback = dyn Fn(&TextField) + Send + Sync;

/// Internal state for a TextField widget
#[derive(Debug)]
struct TextFieldInner {
    /// Current text
    text: String,
    /// Cursor position (byte offset)
    cursor: usize,
    /// Preferred width in characters
    columns: usize,
    /// Visible lines, more than one for a text area
    rows: usize,
    alignment: Alignment,
    /// Shows `*` instead of the characters
    masked: bool,
    enabled: bool,
    border: FieldBorder,
}

impl Default for TextFieldInner {
    fn default() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            columns: 20,
            rows: 1,
            alignment: Alignment::Left,
            masked: false,
            enabled: true,
            border: FieldBorder::Neutral,
        }
    }
}

/// A text entry widget.
///
/// Every change of the text raises the change callbacks registered with
/// [`TextField::on_change`], whether the change came from typing or from
/// [`TextField::set_text`]. Typing into a disabled field is ignored.
#[derive(Debug)]
pub struct TextField {
    /// Unique identifier for this field
    id: WidgetId,
    /// Internal state
    inner: Arc<RwLock<TextFieldInner>>,
    /// Change callbacks
    listeners: Arc<Listeners<ChangeCallback>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Focus request flag
    focus_requested: Arc<AtomicBool>,
}

impl TextField {
    /// Create an empty single line field
    pub fn new() -> Self {
        Self {
            id: WidgetId::new(),
            inner: Arc::new(RwLock::new(TextFieldInner::default())),
            listeners: Arc::new(Listeners::new()),
            dirty: Arc::new(AtomicBool::new(false)),
            focus_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create an empty field with the given width in characters
    pub fn with_columns(columns: usize) -> Self {
        let field = Self::new();
        field.set_columns(columns);
        field
    }

    /// Get the unique ID for this field
    pub fn id(&self) -> WidgetId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Get the current text
    pub fn text(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.text.clone())
            .unwrap_or_default()
    }

    /// Get the text as it appears on screen
    pub fn display_text(&self) -> String {
        self.inner
            .read()
            .map(|guard| {
                if guard.masked {
                    "*".repeat(guard.text.chars().count())
                } else {
                    guard.text.clone()
                }
            })
            .unwrap_or_default()
    }

    /// Get the cursor position (byte offset)
    pub fn cursor(&self) -> usize {
        self.inner.read().map(|guard| guard.cursor).unwrap_or(0)
    }

    pub fn columns(&self) -> usize {
        self.inner.read().map(|guard| guard.columns).unwrap_or(0)
    }

    pub fn rows(&self) -> usize {
        self.inner.read().map(|guard| guard.rows).unwrap_or(1)
    }

    pub fn alignment(&self) -> Alignment {
        self.inner
            .read()
            .map(|guard| guard.alignment)
            .unwrap_or_default()
    }

    pub fn is_masked(&self) -> bool {
        self.inner.read().map(|guard| guard.masked).unwrap_or(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.read().map(|guard| guard.enabled).unwrap_or(false)
    }

    pub fn border(&self) -> FieldBorder {
        self.inner
            .read()
            .map(|guard| guard.border)
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Replace the text. Raises the change callbacks if the text differs.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.text != text => {
                guard.cursor = text.len();
                guard.text = text;
                true
            }
            _ => false,
        };
        if changed {
            self.changed();
        }
    }

    /// Remove all text
    pub fn clear(&self) {
        self.set_text(String::new());
    }

    pub fn set_columns(&self, columns: usize) {
        if let Ok(mut guard) = self.inner.write() {
            guard.columns = columns;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the number of visible lines. A field always shows at least one.
    pub fn set_rows(&self, rows: usize) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows = rows.max(1);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_alignment(&self, alignment: Alignment) {
        if let Ok(mut guard) = self.inner.write() {
            guard.alignment = alignment;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_masked(&self, masked: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.masked = masked;
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

    pub fn set_border(&self, border: FieldBorder) {
        if let Ok(mut guard) = self.inner.write()
            && guard.border != border
        {
            guard.border = border;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Text manipulation (user typing)
    // -------------------------------------------------------------------------

    /// Insert a character at the cursor position
    pub fn insert_char(&self, c: char) {
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.enabled => {
                let cursor = guard.cursor;
                guard.text.insert(cursor, c);
                guard.cursor += c.len_utf8();
                true
            }
            _ => false,
        };
        if changed {
            self.changed();
        }
    }

    /// Type a whole string, one character at a time
    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    /// Delete the character before the cursor (backspace)
    pub fn delete_char_before(&self) {
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.enabled && guard.cursor > 0 => {
                // Find the previous character boundary
                let prev_cursor = guard.text[..guard.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                guard.text.remove(prev_cursor);
                guard.cursor = prev_cursor;
                true
            }
            _ => false,
        };
        if changed {
            self.changed();
        }
    }

    /// Delete the character at the cursor (delete key)
    pub fn delete_char_at(&self) {
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.enabled && guard.cursor < guard.text.len() => {
                let cursor = guard.cursor;
                guard.text.remove(cursor);
                true
            }
            _ => false,
        };
        if changed {
            self.changed();
        }
    }

    /// Move cursor to start
    pub fn cursor_home(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.cursor != 0
        {
            guard.cursor = 0;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move cursor to end
    pub fn cursor_end(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let end = guard.text.len();
            if guard.cursor != end {
                guard.cursor = end;
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Change callbacks
    // -------------------------------------------------------------------------

    /// Register a callback raised after every text change
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&TextField) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(callback))
    }

    /// Remove a change callback
    pub fn remove_on_change(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of registered change callbacks
    pub fn callback_count(&self) -> usize {
        self.listeners.len()
    }

    fn changed(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.listeners.dispatch(None, |callback| callback(self));
    }

    // -------------------------------------------------------------------------
    // Focus control
    // -------------------------------------------------------------------------

    /// Request focus for this field
    pub fn focus(&self) {
        self.focus_requested.store(true, Ordering::SeqCst);
    }

    /// Check and clear the focus request
    pub fn take_focus_request(&self) -> bool {
        self.focus_requested.swap(false, Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for TextField {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            listeners: Arc::clone(&self.listeners),
            dirty: Arc::clone(&self.dirty),
            focus_requested: Arc::clone(&self.focus_requested),
        }
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}
