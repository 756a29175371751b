//! Headless host widgets.
//!
//! These widgets hold display state and raise change callbacks the way a
//! toolkit widget would, without drawing anything. Each widget is a cheap
//! handle: clones share the same state. Beans bind models to them; tests
//! and the demo drive them by calling the methods a user action would
//! trigger (`insert_char`, `toggle`, `click`, `key_typed`, ...).

mod button;
mod label;
mod list_box;
mod panel;
mod progress_bar;
mod text_field;
mod toggle;

pub use button::Button;
pub use label::Label;
pub use list_box::{ListBox, SelectionMode};
pub use panel::{Direction, Panel};
pub use progress_bar::ProgressBar;
pub use text_field::{Alignment, FieldBorder, TextField};
pub use toggle::{ToggleButton, ToggleKind};

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique identifier of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(usize);

impl WidgetId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__widget_{}", self.0)
    }
}

/// Any host widget.
#[derive(Debug, Clone)]
pub enum Widget {
    TextField(TextField),
    Toggle(ToggleButton),
    ListBox(ListBox),
    Label(Label),
    Button(Button),
    Panel(Panel),
    ProgressBar(ProgressBar),
}

impl Widget {
    pub fn id(&self) -> WidgetId {
        match self {
            Widget::TextField(w) => w.id(),
            Widget::Toggle(w) => w.id(),
            Widget::ListBox(w) => w.id(),
            Widget::Label(w) => w.id(),
            Widget::Button(w) => w.id(),
            Widget::Panel(w) => w.id(),
            Widget::ProgressBar(w) => w.id(),
        }
    }

    /// This widget followed by all widgets nested in panels, depth first.
    pub fn descendants(&self) -> Vec<Widget> {
        let mut out = vec![self.clone()];
        if let Widget::Panel(panel) = self {
            for child in panel.children() {
                out.extend(child.descendants());
            }
        }
        out
    }

    /// The first text field in this widget tree
    pub fn find_text_field(&self) -> Option<TextField> {
        self.descendants().into_iter().find_map(|w| match w {
            Widget::TextField(field) => Some(field),
            _ => None,
        })
    }

    /// The first toggle button in this widget tree
    pub fn find_toggle(&self) -> Option<ToggleButton> {
        self.descendants().into_iter().find_map(|w| match w {
            Widget::Toggle(toggle) => Some(toggle),
            _ => None,
        })
    }

    /// The first list box in this widget tree
    pub fn find_list_box(&self) -> Option<ListBox> {
        self.descendants().into_iter().find_map(|w| match w {
            Widget::ListBox(list) => Some(list),
            _ => None,
        })
    }

    /// The first button in this widget tree
    pub fn find_button(&self) -> Option<Button> {
        self.descendants().into_iter().find_map(|w| match w {
            Widget::Button(button) => Some(button),
            _ => None,
        })
    }

    /// Every label in this widget tree
    pub fn labels(&self) -> Vec<Label> {
        self.descendants()
            .into_iter()
            .filter_map(|w| match w {
                Widget::Label(label) => Some(label),
                _ => None,
            })
            .collect()
    }
}

impl From<TextField> for Widget {
    fn from(widget: TextField) -> Self {
        Widget::TextField(widget)
    }
}

impl From<ToggleButton> for Widget {
    fn from(widget: ToggleButton) -> Self {
        Widget::Toggle(widget)
    }
}

impl From<ListBox> for Widget {
    fn from(widget: ListBox) -> Self {
        Widget::ListBox(widget)
    }
}

impl From<Label> for Widget {
    fn from(widget: Label) -> Self {
        Widget::Label(widget)
    }
}

impl From<Button> for Widget {
    fn from(widget: Button) -> Self {
        Widget::Button(widget)
    }
}

impl From<Panel> for Widget {
    fn from(widget: Panel) -> Self {
        Widget::Panel(widget)
    }
}

impl From<ProgressBar> for Widget {
    fn from(widget: ProgressBar) -> Self {
        Widget::ProgressBar(widget)
    }
}
