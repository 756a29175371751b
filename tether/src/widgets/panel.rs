//! Container of other widgets.

use std::sync::{Arc, RwLock};

use super::{Widget, WidgetId};

/// Direction children are laid out in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Row,
    Column,
}

#[derive(Debug)]
struct PanelInner {
    children: Vec<Widget>,
    visible: bool,
}

/// Groups widgets. Composite beans expose a panel as their widget.
#[derive(Debug)]
pub struct Panel {
    id: WidgetId,
    direction: Direction,
    inner: Arc<RwLock<PanelInner>>,
}

impl Panel {
    pub fn new(direction: Direction) -> Self {
        Self {
            id: WidgetId::new(),
            direction,
            inner: Arc::new(RwLock::new(PanelInner {
                children: Vec::new(),
                visible: true,
            })),
        }
    }

    /// Create a row holding the given widgets
    pub fn row(children: impl IntoIterator<Item = Widget>) -> Self {
        let panel = Self::new(Direction::Row);
        for child in children {
            panel.push(child);
        }
        panel
    }

    /// Create a column holding the given widgets
    pub fn column(children: impl IntoIterator<Item = Widget>) -> Self {
        let panel = Self::new(Direction::Column);
        for child in children {
            panel.push(child);
        }
        panel
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn children(&self) -> Vec<Widget> {
        self.inner
            .read()
            .map(|guard| guard.children.clone())
            .unwrap_or_default()
    }

    pub fn push(&self, child: Widget) {
        if let Ok(mut guard) = self.inner.write() {
            guard.children.push(child);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.read().map(|guard| guard.visible).unwrap_or(false)
    }

    pub fn set_visible(&self, visible: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.visible = visible;
        }
    }
}

impl Clone for Panel {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            direction: self.direction,
            inner: Arc::clone(&self.inner),
        }
    }
}
