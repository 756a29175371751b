//! Combo box and list bound to a list model.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{Bean, BeanState, Disposable, Lifecycle, RenderGuard};
use crate::error::BeanError;
use crate::model::{ListModel, ListenerId, WeakModel};
use crate::widgets::{ListBox, SelectionMode, Widget};

type Formatter<T> = dyn Fn(&T) -> String + Send + Sync;

struct Binding<T> {
    formatter: Arc<Formatter<T>>,
    /// Items the list box currently shows.
    displayed: Mutex<Vec<T>>,
    rendering: AtomicBool,
    listener: Mutex<Option<ListenerId>>,
}

impl<T> Binding<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn origin(&self) -> Option<ListenerId> {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render(&self, model: &ListModel<T>, list: &ListBox) {
        let selected = model.selected_indices();
        {
            let _rendering = RenderGuard::enter(&self.rendering);

            let items = model.items();
            let mut displayed = self.displayed.lock().unwrap_or_else(PoisonError::into_inner);
            if *displayed != items {
                list.set_labels(items.iter().map(|item| (self.formatter)(item)).collect());
                *displayed = items;
            }
            drop(displayed);

            if list.selected_indices() != selected {
                list.set_selected_indices(selected.clone());
            }
        }
        list.set_enabled(model.is_enabled());

        // A single selection list keeps at most one index; hand the
        // normalized selection back so model and widget agree.
        let shown = list.selected_indices();
        if list.mode() == SelectionMode::Single && shown != selected {
            log::trace!("List {} normalized selection {:?} to {:?}", list.id(), selected, shown);
            model.set_selected_indices(shown, self.origin());
        }
    }

    fn selection_changed(&self, model: &ListModel<T>, list: &ListBox) {
        if self.rendering.load(Ordering::SeqCst) {
            return;
        }
        let selected = list.selected_indices();
        if selected != model.selected_indices() {
            model.set_selected_indices(selected, self.origin());
        }
    }
}

/// A [`ListBox`] bound to a [`ListModel`].
///
/// In [`SelectionMode::Single`] this is a combo box, in
/// [`SelectionMode::Multi`] a list. Item labels come from the formatter,
/// `Display` by default.
pub struct ListSelectionBean<T> {
    model: ListModel<T>,
    list: ListBox,
    binding: Arc<Binding<T>>,
    lifecycle: Lifecycle,
    model_listener: Option<ListenerId>,
    list_callback: Option<ListenerId>,
}

impl<T> ListSelectionBean<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a bean that labels items with `formatter`.
    pub fn with_formatter<F>(model: ListModel<T>, mode: SelectionMode, formatter: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let list = ListBox::new(mode);
        Self {
            lifecycle: Lifecycle::new(format!("list {}", list.id())),
            model,
            list,
            binding: Arc::new(Binding {
                formatter: Arc::new(formatter),
                displayed: Mutex::new(Vec::new()),
                rendering: AtomicBool::new(false),
                listener: Mutex::new(None),
            }),
            model_listener: None,
            list_callback: None,
        }
    }

    /// Create a single selection bean (combo box).
    pub fn combo_box(model: ListModel<T>) -> Self
    where
        T: fmt::Display,
    {
        Self::with_formatter(model, SelectionMode::Single, T::to_string)
    }

    /// Create a multi selection bean (list).
    pub fn list(model: ListModel<T>) -> Self
    where
        T: fmt::Display,
    {
        Self::with_formatter(model, SelectionMode::Multi, T::to_string)
    }

    pub fn list_box(&self) -> &ListBox {
        &self.list
    }

    pub fn model(&self) -> &ListModel<T> {
        &self.model
    }
}

impl<T> Bean for ListSelectionBean<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn init_bean(&mut self) -> Result<(), BeanError> {
        self.lifecycle.activate()?;

        let binding = Arc::clone(&self.binding);
        let list = self.list.clone();
        let listener = self
            .model
            .add_listener(move |model| binding.render(model, &list));
        *self
            .binding
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(listener);
        self.model_listener = Some(listener);

        let binding = Arc::clone(&self.binding);
        let model: WeakModel<_> = self.model.downgrade();
        self.list_callback = Some(self.list.on_selection_change(move |list| {
            if let Some(model) = model.upgrade() {
                binding.selection_changed(&model, list);
            }
        }));

        self.binding.render(&self.model, &self.list);
        Ok(())
    }

    fn widget(&self) -> Widget {
        Widget::ListBox(self.list.clone())
    }

    fn state(&self) -> BeanState {
        self.lifecycle.state()
    }
}

impl<T> Disposable for ListSelectionBean<T> {
    fn close(&mut self) {
        if !self.lifecycle.close() {
            return;
        }
        if let Some(id) = self.model_listener.take() {
            self.model.remove_listener(id);
        }
        if let Some(id) = self.list_callback.take() {
            self.list.remove_on_selection_change(id);
        }
    }
}

impl<T> fmt::Debug for ListSelectionBean<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSelectionBean")
            .field("list", &self.list.id())
            .field("model", &self.model.id())
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
