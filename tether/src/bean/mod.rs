//! Widgets bound to models.
//!
//! A bean owns one host widget and keeps it in sync with one [`Model`]:
//! user edits are parsed and written to the model, model changes are
//! rendered into the widget. Writes made by a bean name the bean's own
//! listener as origin, so the bean is never told about its own edits.
//!
//! Beans follow a strict lifecycle:
//!
//! ```text
//! Uninitialized --init_bean--> Active --close--> Closed
//! ```
//!
//! Nothing is registered before `init_bean`, and nothing stays registered
//! after `close`.
//!
//! [`Model`]: crate::model::Model

mod codec;
mod date;
mod decorator;
mod factory;
mod file;
mod label;
mod list;
mod radio;
mod text_field;
mod toggle;

pub use codec::{DateCodec, DoubleCodec, FnCodec, IntegerCodec, PathCodec, StringCodec, TextCodec};
pub use date::{CalendarView, DateSelectionBean};
pub use decorator::ErrorMessageDecorator;
pub use factory::{BeanFactory, Decorated};
pub use file::{FileChooser, FileFilter, FileSelectionBean};
pub use label::LabelBean;
pub use list::ListSelectionBean;
pub use radio::RadioButtonGroup;
pub use text_field::{FieldOptions, ParseFailurePolicy, TextFieldBean};
pub use toggle::ToggleBean;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::BeanError;
use crate::widgets::Widget;

/// A resource that must be released explicitly.
pub trait Disposable {
    /// Release the resource. Calling this more than once has no effect.
    fn close(&mut self);
}

/// A visual input widget bound to one model.
pub trait Bean: Disposable + Send {
    /// Register the listeners and render the model for the first time.
    ///
    /// Fails when the bean is already active or has been closed.
    fn init_bean(&mut self) -> Result<(), BeanError>;

    /// The widget to place in a view.
    fn widget(&self) -> Widget;

    /// Current lifecycle state.
    fn state(&self) -> BeanState;
}

impl<B: Bean + ?Sized> Disposable for Box<B> {
    fn close(&mut self) {
        (**self).close();
    }
}

impl<B: Bean + ?Sized> Bean for Box<B> {
    fn init_bean(&mut self) -> Result<(), BeanError> {
        (**self).init_bean()
    }

    fn widget(&self) -> Widget {
        (**self).widget()
    }

    fn state(&self) -> BeanState {
        (**self).state()
    }
}

/// Lifecycle state of a bean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BeanState {
    /// Constructed, nothing registered yet.
    #[default]
    Uninitialized,
    /// Listening to its model and widget.
    Active,
    /// Released; cannot be initialized again.
    Closed,
}

impl fmt::Display for BeanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanState::Uninitialized => write!(f, "uninitialized"),
            BeanState::Active => write!(f, "active"),
            BeanState::Closed => write!(f, "closed"),
        }
    }
}

/// Lifecycle bookkeeping shared by all beans.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    name: String,
    state: BeanState,
}

impl Lifecycle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: BeanState::Uninitialized,
        }
    }

    pub(crate) fn state(&self) -> BeanState {
        self.state
    }

    /// Move to `Active`, or report why that is not allowed.
    pub(crate) fn activate(&mut self) -> Result<(), BeanError> {
        match self.state {
            BeanState::Uninitialized => {
                self.state = BeanState::Active;
                log::debug!("Bean {} initialized", self.name);
                Ok(())
            }
            BeanState::Active => Err(BeanError::AlreadyInitialized(self.name.clone())),
            BeanState::Closed => Err(BeanError::Closed(self.name.clone())),
        }
    }

    /// Undo a successful [`Lifecycle::activate`] whose follow-up failed.
    pub(crate) fn rollback(&mut self) {
        if self.state == BeanState::Active {
            self.state = BeanState::Uninitialized;
        }
    }

    /// Move to `Closed`. Returns true when the bean was active and has
    /// registrations to release.
    pub(crate) fn close(&mut self) -> bool {
        let was_active = self.state == BeanState::Active;
        if self.state != BeanState::Closed {
            log::debug!("Bean {} closed", self.name);
        }
        self.state = BeanState::Closed;
        was_active
    }
}

/// Raises a bean's rendering flag until dropped, also when rendering
/// unwinds.
pub(crate) struct RenderGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RenderGuard<'a> {
    pub(crate) fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Disposables owned by a view, closed together.
///
/// Items are closed in reverse order of registration, so a bean added
/// after the beans it depends on is released first.
#[derive(Default)]
pub struct Closeables {
    items: Vec<Box<dyn Disposable + Send>>,
}

impl Closeables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a disposable.
    pub fn add<D: Disposable + Send + 'static>(&mut self, item: D) {
        self.items.push(Box::new(item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Disposable for Closeables {
    fn close(&mut self) {
        if !self.items.is_empty() {
            log::debug!("Closing {} disposable(s)", self.items.len());
        }
        while let Some(mut item) = self.items.pop() {
            item.close();
        }
    }
}

impl fmt::Debug for Closeables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closeables")
            .field("count", &self.items.len())
            .finish()
    }
}
