//! Radio buttons of which at most one is selected.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Bean, Disposable, ErrorMessageDecorator, ToggleBean};
use crate::model::{BooleanModel, ListenerId, ModelId, WeakModel};
use crate::widgets::{Direction, Panel, Widget};

struct Member {
    model_id: ModelId,
    model: WeakModel<bool>,
    /// The group's listener on this member's model.
    listener: ListenerId,
}

/// Write `false` to every member except `selected`.
fn deselect_others(members: &Mutex<Vec<Member>>, selected: ModelId) {
    let others: Vec<(WeakModel<bool>, ListenerId)> = members
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .filter(|member| member.model_id != selected)
        .map(|member| (member.model.clone(), member.listener))
        .collect();
    for (model, listener) in others {
        if let Some(model) = model.upgrade() {
            model.set_with_source(false, Some(listener));
        }
    }
}

/// A column of radio buttons over separate boolean models.
///
/// When a member's model becomes `true`, the group writes `false` to the
/// models of all other members. A button added while another member is
/// already selected is cleared. Closing the group closes its buttons.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use tether::bean::{BeanFactory, Disposable};
/// use tether::model::BooleanModel;
/// use tether::text::TextBundle;
///
/// let factory = BeanFactory::new(Arc::new(TextBundle::english()));
/// let (yes, no) = (BooleanModel::default(), BooleanModel::default());
/// let mut group = factory
///     .create_radio_button_group(&[("gen.yes", &yes), ("gen.no", &no)])
///     .unwrap();
///
/// yes.set(true);
/// no.set(true);
/// assert!(!yes.get());
/// assert_eq!(group.selected_index(), Some(1));
/// group.close();
/// ```
pub struct RadioButtonGroup {
    buttons: Vec<ErrorMessageDecorator<ToggleBean>>,
    members: Arc<Mutex<Vec<Member>>>,
    panel: Panel,
}

impl RadioButtonGroup {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
            members: Arc::new(Mutex::new(Vec::new())),
            panel: Panel::new(Direction::Column),
        }
    }

    /// Add a radio button and make its model exclusive with the others.
    pub fn add(&mut self, button: ErrorMessageDecorator<ToggleBean>) {
        let model: BooleanModel = button.inner().model().clone();
        let model_id = model.id();

        let members = Arc::clone(&self.members);
        let listener = model.add_listener(move |model| {
            if model.get() {
                deselect_others(&members, model_id);
            }
        });
        if model.get() && self.selected_index().is_some() {
            log::debug!("Radio button {} added while another is selected", model_id);
            model.set_with_source(false, Some(listener));
        }

        self.members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Member {
                model_id,
                model: model.downgrade(),
                listener,
            });
        self.panel.push(button.widget());
        self.buttons.push(button);
    }

    pub fn buttons(&self) -> &[ErrorMessageDecorator<ToggleBean>] {
        &self.buttons
    }

    /// Index of the selected button.
    pub fn selected_index(&self) -> Option<usize> {
        self.buttons
            .iter()
            .position(|button| button.inner().model().get())
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// The column holding the buttons.
    pub fn widget(&self) -> Widget {
        Widget::Panel(self.panel.clone())
    }
}

impl Default for RadioButtonGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposable for RadioButtonGroup {
    fn close(&mut self) {
        let members: Vec<Member> = self
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for member in members {
            if let Some(model) = member.model.upgrade() {
                model.remove_listener(member.listener);
            }
        }
        for button in self.buttons.iter_mut().rev() {
            button.close();
        }
    }
}

impl fmt::Debug for RadioButtonGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadioButtonGroup")
            .field("panel", &self.panel.id())
            .field("buttons", &self.buttons.len())
            .field("selected", &self.selected_index())
            .finish()
    }
}
