//! File path field with a chooser button.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Bean, BeanState, Disposable, FieldOptions, Lifecycle, PathCodec, TextFieldBean};
use crate::error::BeanError;
use crate::model::{FileModel, ListenerId, WeakModel};
use crate::text::TextResource;
use crate::widgets::{Button, Panel, TextField, Widget};

/// Restricts a chooser to files with certain extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    /// Shown next to the filter in a chooser.
    pub description: String,
    /// Accepted extensions without the dot, compared ignoring case.
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(description: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            description: description.into(),
            extensions: extensions.iter().map(|ext| ext.to_lowercase()).collect(),
        }
    }

    /// Whether `path` has one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}

/// Asks the user for a file.
///
/// The platform's dialog implements this; tests use a fake that returns a
/// fixed path.
pub trait FileChooser: Send + Sync {
    /// Returns the chosen file, or `None` when the user cancelled.
    fn choose(&self, current: Option<&Path>, filter: Option<&FileFilter>) -> Option<PathBuf>;
}

/// A path text field plus a button that opens a [`FileChooser`].
pub struct FileSelectionBean {
    text: TextFieldBean<Option<PathBuf>, PathCodec>,
    button: Button,
    panel: Panel,
    chooser: Arc<dyn FileChooser>,
    filter: Option<FileFilter>,
    lifecycle: Lifecycle,
    model_listener: Option<ListenerId>,
    button_callback: Option<ListenerId>,
}

impl FileSelectionBean {
    pub fn new(
        model: FileModel,
        chooser: Arc<dyn FileChooser>,
        resource: &dyn TextResource,
        options: FieldOptions,
    ) -> Self {
        let text = TextFieldBean::with_options(model, PathCodec, options);
        let button = Button::new(resource.string("gen.choose"));
        let panel = Panel::row([text.widget(), Widget::Button(button.clone())]);
        Self {
            lifecycle: Lifecycle::new(format!("file field {}", text.field().id())),
            text,
            button,
            panel,
            chooser,
            filter: None,
            model_listener: None,
            button_callback: None,
        }
    }

    /// Only offer files accepted by `filter`.
    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn field(&self) -> &TextField {
        self.text.field()
    }

    pub fn choose_button(&self) -> &Button {
        &self.button
    }

    pub fn model(&self) -> &FileModel {
        self.text.model()
    }
}

impl Bean for FileSelectionBean {
    fn init_bean(&mut self) -> Result<(), BeanError> {
        self.lifecycle.activate()?;
        if let Err(err) = self.text.init_bean() {
            self.lifecycle.rollback();
            return Err(err);
        }

        let button = self.button.clone();
        button.set_enabled(self.text.model().is_enabled());
        self.model_listener = Some(
            self.text
                .model()
                .add_listener(move |model| button.set_enabled(model.is_enabled())),
        );

        let model: WeakModel<_> = self.text.model().downgrade();
        let chooser = Arc::clone(&self.chooser);
        let filter = self.filter.clone();
        self.button_callback = Some(self.button.on_click(move |_| {
            let Some(model) = model.upgrade() else {
                return;
            };
            let current = model.get();
            match chooser.choose(current.as_deref(), filter.as_ref()) {
                Some(path) => {
                    log::debug!("Chose file {}", path.display());
                    model.set(Some(path));
                }
                None => log::trace!("File chooser cancelled"),
            }
        }));
        Ok(())
    }

    fn widget(&self) -> Widget {
        Widget::Panel(self.panel.clone())
    }

    fn state(&self) -> BeanState {
        self.lifecycle.state()
    }
}

impl Disposable for FileSelectionBean {
    fn close(&mut self) {
        if !self.lifecycle.close() {
            return;
        }
        if let Some(id) = self.model_listener.take() {
            self.text.model().remove_listener(id);
        }
        if let Some(id) = self.button_callback.take() {
            self.button.remove_on_click(id);
        }
        self.text.close();
    }
}

impl fmt::Debug for FileSelectionBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSelectionBean")
            .field("text", &self.text)
            .field("filter", &self.filter)
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
