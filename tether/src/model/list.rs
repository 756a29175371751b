//! Selectable list state and the list model operations.

use super::{ListModel, ListenerId, Model};

/// Items plus the indices selected among them.
///
/// `selected` is kept sorted, free of duplicates and within range of
/// `items`. Two states are equal when their items compare equal by value
/// and the same indices are selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    items: Vec<T>,
    selected: Vec<usize>,
}

impl<T> ListState<T> {
    /// Create a state with the given items and nothing selected.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            selected: Vec::new(),
        }
    }

    /// The items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Selected indices, ascending.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// The selected index when exactly one item is selected.
    pub fn selected_index(&self) -> Option<usize> {
        match self.selected.as_slice() {
            [index] => Some(*index),
            _ => None,
        }
    }

    /// The item at [`ListState::selected_index`].
    pub fn selected_item(&self) -> Option<&T> {
        self.selected_index().and_then(|index| self.items.get(index))
    }

    /// Every selected item, in item order.
    pub fn selected_items(&self) -> Vec<&T> {
        self.selected
            .iter()
            .filter_map(|&index| self.items.get(index))
            .collect()
    }

    /// Replace the items, dropping selected indices that fall out of range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        let len = self.items.len();
        self.selected.retain(|&index| index < len);
    }

    /// Append one item.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Select one index, or clear the selection with `None`.
    ///
    /// An out of range index clears the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected.clear();
        if let Some(index) = index.filter(|&index| index < self.items.len()) {
            self.selected.push(index);
        }
    }

    /// Select several indices. Out of range and duplicate entries are dropped.
    pub fn select_all(&mut self, indices: impl IntoIterator<Item = usize>) {
        let len = self.items.len();
        let mut selected: Vec<usize> = indices.into_iter().filter(|&index| index < len).collect();
        selected.sort_unstable();
        selected.dedup();
        self.selected = selected;
    }
}

impl<T: PartialEq> ListState<T> {
    /// Index of the first item equal to `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone + PartialEq> ListModel<T> {
    /// Create a list model with nothing selected.
    pub fn with_items(items: Vec<T>) -> Self {
        Model::new(ListState::new(items))
    }

    /// Get a copy of the items.
    pub fn items(&self) -> Vec<T> {
        self.with(|state| state.items.clone())
    }

    /// Replace the items. Notifies only when they differ by value.
    pub fn set_items(&self, items: Vec<T>, source: Option<ListenerId>) -> bool {
        self.update(source, |state| state.set_items(items))
    }

    /// Append one item.
    pub fn add_item(&self, item: T, source: Option<ListenerId>) -> bool {
        self.update(source, |state| state.push(item))
    }

    /// The selected index when exactly one item is selected.
    pub fn selected_index(&self) -> Option<usize> {
        self.with(ListState::selected_index)
    }

    /// Selected indices, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.with(|state| state.selected.clone())
    }

    /// Select one index or clear the selection.
    pub fn set_selected_index(&self, index: Option<usize>, source: Option<ListenerId>) -> bool {
        self.update(source, |state| state.select(index))
    }

    /// Select several indices.
    pub fn set_selected_indices(&self, indices: Vec<usize>, source: Option<ListenerId>) -> bool {
        self.update(source, |state| state.select_all(indices))
    }

    /// The single selected item.
    pub fn selected_item(&self) -> Option<T> {
        self.with(|state| state.selected_item().cloned())
    }

    /// Select the first item equal to `item`; `None` clears the selection.
    ///
    /// An item that is not in the list clears the selection as well.
    pub fn set_selected_item(&self, item: Option<&T>, source: Option<ListenerId>) -> bool {
        self.update(source, |state| {
            let index = item.and_then(|item| state.position(item));
            state.select(index);
        })
    }

    /// Every selected item.
    pub fn selected_items(&self) -> Vec<T> {
        self.with(|state| state.selected_items().into_iter().cloned().collect())
    }
}
