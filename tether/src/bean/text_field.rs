//! Text entry bound to a model through a codec.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::{Bean, BeanState, Disposable, Lifecycle, RenderGuard, TextCodec};
use crate::error::BeanError;
use crate::model::{ListenerId, Model, WeakModel};
use crate::widgets::{Alignment, FieldBorder, TextField, Widget};

/// What happens to the model when the user's text cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseFailurePolicy {
    /// The model keeps its last valid value.
    #[default]
    KeepModel,
    /// The model is reset to its absent value.
    ClearModel,
}

/// Presentation and behavior of a text field.
///
/// Can be built in code or deserialized from a form description:
///
/// ```
/// use tether::bean::{FieldOptions, ParseFailurePolicy};
/// use tether::widgets::Alignment;
///
/// let options: FieldOptions =
///     serde_json::from_str(r#"{ "columns": 8, "alignment": "right" }"#).unwrap();
/// assert_eq!(options.columns, 8);
/// assert_eq!(options.alignment, Alignment::Right);
/// assert_eq!(options.parse_failure, ParseFailurePolicy::KeepModel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    pub columns: usize,
    /// More than one row makes a text area.
    pub rows: usize,
    pub alignment: Alignment,
    /// Show `*` instead of the entered characters.
    pub masked: bool,
    pub parse_failure: ParseFailurePolicy,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 1,
            alignment: Alignment::Left,
            masked: false,
            parse_failure: ParseFailurePolicy::KeepModel,
        }
    }
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn right_aligned(self) -> Self {
        self.alignment(Alignment::Right)
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn parse_failure(mut self, policy: ParseFailurePolicy) -> Self {
        self.parse_failure = policy;
        self
    }

    fn apply(&self, field: &TextField) {
        field.set_columns(self.columns);
        field.set_rows(self.rows);
        field.set_alignment(self.alignment);
        field.set_masked(self.masked);
    }
}

/// State shared between the bean and its two callbacks.
struct Binding<T, C> {
    codec: C,
    policy: ParseFailurePolicy,
    /// The value the field last showed or produced.
    shown: Mutex<Option<T>>,
    /// Set while the bean writes into the field.
    rendering: AtomicBool,
    /// The bean's model listener, used as change origin.
    listener: Mutex<Option<ListenerId>>,
}

impl<T, C> Binding<T, C>
where
    T: Clone + PartialEq + Default + Send + Sync + 'static,
    C: TextCodec<T>,
{
    fn origin(&self) -> Option<ListenerId> {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember(&self, value: T) {
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Model to widget.
    ///
    /// The text is only replaced when the model value differs from what the
    /// field last showed, so unparsable text survives error and enabled
    /// notifications.
    fn render(&self, model: &Model<T>, field: &TextField) {
        let value = model.get();
        let stale = self
            .shown
            .lock()
            .map(|shown| shown.as_ref() != Some(&value))
            .unwrap_or(true);
        if stale {
            let text = self.codec.format(&value);
            {
                let _rendering = RenderGuard::enter(&self.rendering);
                field.set_text(text);
            }
            field.set_border(FieldBorder::Neutral);
            self.remember(value);
        }
        field.set_enabled(model.is_enabled());
    }

    /// Widget to model.
    fn parse_user_input(&self, model: &Model<T>, field: &TextField) {
        if self.rendering.load(Ordering::SeqCst) {
            return;
        }
        let text = field.text();
        match self.codec.parse(&text) {
            Ok(value) => {
                field.set_border(FieldBorder::Neutral);
                self.remember(value.clone());
                model.set_with_source(value, self.origin());
            }
            Err(err) => {
                log::trace!("Field {} holds unparsable text: {}", field.id(), err);
                let border = if text.is_empty() {
                    FieldBorder::Neutral
                } else {
                    FieldBorder::Invalid
                };
                field.set_border(border);
                if self.policy == ParseFailurePolicy::ClearModel {
                    let cleared = T::default();
                    self.remember(cleared.clone());
                    model.set_with_source(cleared, self.origin());
                }
            }
        }
    }
}

/// A text field bound to a `Model<T>`.
///
/// The codec decides how values are shown and how typed text is read
/// back. With a [`StringCodec`](super::StringCodec) this is a plain text
/// field; with a [`DateCodec`](super::DateCodec) a date field, and so on.
///
/// # Example
///
/// ```
/// use tether::bean::{Bean, Disposable, IntegerCodec, TextFieldBean};
/// use tether::model::IntegerModel;
///
/// let model = IntegerModel::default();
/// let mut bean = TextFieldBean::new(model.clone(), IntegerCodec);
/// bean.init_bean().unwrap();
///
/// bean.field().type_text("42");
/// assert_eq!(model.get(), Some(42));
///
/// model.set(Some(7));
/// assert_eq!(bean.field().text(), "7");
/// bean.close();
/// ```
pub struct TextFieldBean<T, C> {
    model: Model<T>,
    field: TextField,
    options: FieldOptions,
    binding: Arc<Binding<T, C>>,
    lifecycle: Lifecycle,
    model_listener: Option<ListenerId>,
    field_callback: Option<ListenerId>,
}

impl<T, C> TextFieldBean<T, C>
where
    T: Clone + PartialEq + Default + Send + Sync + 'static,
    C: TextCodec<T> + 'static,
{
    /// Create a bean with default options.
    pub fn new(model: Model<T>, codec: C) -> Self {
        Self::with_options(model, codec, FieldOptions::default())
    }

    /// Create a bean with the given options.
    pub fn with_options(model: Model<T>, codec: C, options: FieldOptions) -> Self {
        let field = TextField::new();
        options.apply(&field);
        Self {
            lifecycle: Lifecycle::new(format!("text field {}", field.id())),
            binding: Arc::new(Binding {
                codec,
                policy: options.parse_failure,
                shown: Mutex::new(None),
                rendering: AtomicBool::new(false),
                listener: Mutex::new(None),
            }),
            model,
            field,
            options,
            model_listener: None,
            field_callback: None,
        }
    }

    /// The host widget.
    pub fn field(&self) -> &TextField {
        &self.field
    }

    /// The bound model.
    pub fn model(&self) -> &Model<T> {
        &self.model
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Handle of the bean's model listener while active.
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.model_listener
    }
}

impl<T, C> Bean for TextFieldBean<T, C>
where
    T: Clone + PartialEq + Default + Send + Sync + 'static,
    C: TextCodec<T> + 'static,
{
    fn init_bean(&mut self) -> Result<(), BeanError> {
        self.lifecycle.activate()?;

        let binding = Arc::clone(&self.binding);
        let field = self.field.clone();
        let listener = self
            .model
            .add_listener(move |model| binding.render(model, &field));
        *self
            .binding
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(listener);
        self.model_listener = Some(listener);

        let binding = Arc::clone(&self.binding);
        let model: WeakModel<T> = self.model.downgrade();
        self.field_callback = Some(self.field.on_change(move |field| {
            if let Some(model) = model.upgrade() {
                binding.parse_user_input(&model, field);
            }
        }));

        self.binding.render(&self.model, &self.field);
        Ok(())
    }

    fn widget(&self) -> Widget {
        Widget::TextField(self.field.clone())
    }

    fn state(&self) -> BeanState {
        self.lifecycle.state()
    }
}

impl<T, C> Disposable for TextFieldBean<T, C> {
    fn close(&mut self) {
        if !self.lifecycle.close() {
            return;
        }
        if let Some(id) = self.model_listener.take() {
            self.model.remove_listener(id);
        }
        if let Some(id) = self.field_callback.take() {
            self.field.remove_on_change(id);
        }
    }
}

impl<T, C> fmt::Debug for TextFieldBean<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldBean")
            .field("field", &self.field.id())
            .field("model", &self.model.id())
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
