//! Item list with single or multiple selection and keyboard search.
//!
//! Used as a drop-down (combo box) in [`SelectionMode::Single`] and as a
//! plain list in [`SelectionMode::Multi`]. Typing letters or digits while
//! the list has focus selects the first item whose label contains the typed
//! text, ignoring case.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::WidgetId;
use crate::model::{ListenerId, Listeners};

/// Selection mode for a list box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one item is selected
    #[default]
    Single,
    /// Any number of items can be selected
    Multi,
}

type SelectionCallback = dyn Fn(&ListBox) + Send + Sync;

#[derive(Debug, Default)]
struct ListBoxInner {
    /// Item labels in display order
    labels: Vec<String>,
    /// Lower-cased labels for searching
    search_labels: Vec<String>,
    /// Selected indices, ascending
    selected: Vec<usize>,
    /// Text typed since the list gained focus
    search: String,
    enabled: bool,
}

impl ListBoxInner {
    fn normalize(&self, mode: SelectionMode, indices: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let len = self.labels.len();
        let mut selected: Vec<usize> = indices.into_iter().filter(|&i| i < len).collect();
        selected.sort_unstable();
        selected.dedup();
        if mode == SelectionMode::Single {
            selected.truncate(1);
        }
        selected
    }

    fn first_match(&self) -> Option<usize> {
        self.search_labels
            .iter()
            .position(|label| label.contains(&self.search))
    }
}

/// A list of text items with a selection.
#[derive(Debug)]
pub struct ListBox {
    id: WidgetId,
    mode: SelectionMode,
    inner: Arc<RwLock<ListBoxInner>>,
    listeners: Arc<Listeners<SelectionCallback>>,
    dirty: Arc<AtomicBool>,
}

impl ListBox {
    /// Create an empty list box
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            id: WidgetId::new(),
            mode,
            inner: Arc::new(RwLock::new(ListBoxInner {
                enabled: true,
                ..Default::default()
            })),
            listeners: Arc::new(Listeners::new()),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn labels(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| guard.labels.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.labels.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected indices, ascending
    pub fn selected_indices(&self) -> Vec<usize> {
        self.inner
            .read()
            .map(|guard| guard.selected.clone())
            .unwrap_or_default()
    }

    /// The selected index when exactly one item is selected
    pub fn selected_index(&self) -> Option<usize> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| match guard.selected.as_slice() {
                [index] => Some(*index),
                _ => None,
            })
    }

    /// Text typed since the list gained focus, lower-cased
    pub fn search_text(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.search.clone())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.read().map(|guard| guard.enabled).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Replace the items. Selected indices past the new end are dropped,
    /// which raises the selection callbacks.
    pub fn set_labels(&self, labels: Vec<String>) {
        let changed = match self.inner.write() {
            Ok(mut guard) => {
                guard.search_labels = labels.iter().map(|label| label.to_lowercase()).collect();
                guard.labels = labels;
                let selected = guard.normalize(self.mode, guard.selected.clone());
                let changed = selected != guard.selected;
                guard.selected = selected;
                self.dirty.store(true, Ordering::SeqCst);
                changed
            }
            Err(_) => false,
        };
        if changed {
            self.selection_changed();
        }
    }

    /// Replace the selection. Raises the callbacks if it changed.
    pub fn set_selected_indices(&self, indices: Vec<usize>) {
        let changed = match self.inner.write() {
            Ok(mut guard) => {
                let selected = guard.normalize(self.mode, indices);
                let changed = selected != guard.selected;
                guard.selected = selected;
                changed
            }
            Err(_) => false,
        };
        if changed {
            self.selection_changed();
        }
    }

    /// Select one item, or nothing with `None`.
    pub fn select_index(&self, index: Option<usize>) {
        self.set_selected_indices(index.into_iter().collect());
    }

    /// Add or remove one index from a multi selection (ctrl-click).
    /// In single mode this selects the index.
    pub fn toggle_index(&self, index: usize) {
        if self.mode == SelectionMode::Single {
            self.select_index(Some(index));
            return;
        }
        let mut selected = self.selected_indices();
        match selected.iter().position(|&i| i == index) {
            Some(position) => {
                selected.remove(position);
            }
            None => selected.push(index),
        }
        self.set_selected_indices(selected);
    }

    pub fn set_enabled(&self, enabled: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.enabled != enabled
        {
            guard.enabled = enabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard search
    // -------------------------------------------------------------------------

    /// A key was typed. Letters and digits extend the search text.
    ///
    /// Selects the first matching item; with no match the selection stays.
    pub fn key_typed(&self, c: char) {
        if !c.is_alphanumeric() || !self.is_enabled() {
            return;
        }
        let found = match self.inner.write() {
            Ok(mut guard) => {
                guard.search.extend(c.to_lowercase());
                guard.first_match()
            }
            Err(_) => None,
        };
        log::trace!("List {} search {:?} -> {:?}", self.id, self.search_text(), found);
        if found.is_some() {
            self.select_index(found);
        }
    }

    /// Backspace shortens the search text and searches again.
    pub fn backspace(&self) {
        if !self.is_enabled() {
            return;
        }
        let found = match self.inner.write() {
            Ok(mut guard) => match guard.search.pop() {
                Some(_) => guard.first_match(),
                None => None,
            },
            Err(_) => None,
        };
        if found.is_some() {
            self.select_index(found);
        }
    }

    /// Focus entered the list. Starts a fresh search.
    pub fn focus_gained(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.clear();
        }
    }

    // -------------------------------------------------------------------------
    // Selection callbacks
    // -------------------------------------------------------------------------

    /// Register a callback raised after the selection changed
    pub fn on_selection_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ListBox) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(callback))
    }

    pub fn remove_on_selection_change(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn callback_count(&self) -> usize {
        self.listeners.len()
    }

    fn selection_changed(&self) {
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

impl Clone for ListBox {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            mode: self.mode,
            inner: Arc::clone(&self.inner),
            listeners: Arc::clone(&self.listeners),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> ListBox {
        let list = ListBox::new(SelectionMode::Single);
        list.set_labels(vec!["Apple".into(), "Banana".into(), "Cherry".into()]);
        list
    }

    #[test]
    fn test_single_mode_keeps_one_index() {
        let list = fruit();
        list.set_selected_indices(vec![2, 1]);
        assert_eq!(list.selected_indices(), vec![1]);
    }

    #[test]
    fn test_shrinking_labels_drops_selection() {
        let list = fruit();
        list.select_index(Some(2));
        list.set_labels(vec!["Apple".into()]);
        assert_eq!(list.selected_index(), None);
    }

    #[test]
    fn test_backspace_on_empty_search_is_noop() {
        let list = fruit();
        list.select_index(Some(1));
        list.backspace();
        assert_eq!(list.selected_index(), Some(1));
        assert_eq!(list.search_text(), "");
    }
}
