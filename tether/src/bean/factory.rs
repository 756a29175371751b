//! Construction of decorated, initialized beans.

use std::fmt;
use std::sync::Arc;

use super::{
    Bean, DateSelectionBean, Disposable, DoubleCodec, ErrorMessageDecorator, FieldOptions,
    FileChooser, FileFilter, FileSelectionBean, IntegerCodec, LabelBean, ListSelectionBean,
    ParseFailurePolicy, RadioButtonGroup, StringCodec, TextFieldBean, ToggleBean,
};
use crate::error::BeanError;
use crate::model::{
    AnyModel, BooleanModel, DateModel, DoubleModel, FileModel, IntegerModel, ListModel,
    StringModel,
};
use crate::text::TextResource;
use crate::widgets::SelectionMode;

/// A bean wrapped in an [`ErrorMessageDecorator`].
pub type Decorated<B> = ErrorMessageDecorator<B>;

type StringField = TextFieldBean<Option<String>, StringCodec>;

/// Builds beans for models.
///
/// Every creator wraps the bean in an [`ErrorMessageDecorator`], initializes
/// it and hands it back ready to be placed in a view. The caller owns the
/// result and must close it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use tether::bean::{BeanFactory, Disposable, FieldOptions};
/// use tether::model::StringModel;
/// use tether::text::TextBundle;
///
/// let factory = BeanFactory::new(Arc::new(TextBundle::english()));
/// let name = StringModel::default().must_be_filled(true);
/// let mut bean = factory.create_text_field(&name, FieldOptions::new()).unwrap();
///
/// name.validate();
/// assert_eq!(bean.error_text(), "This field must be filled in.");
/// bean.close();
/// ```
#[derive(Clone)]
pub struct BeanFactory {
    resource: Arc<dyn TextResource>,
}

impl BeanFactory {
    pub fn new(resource: Arc<dyn TextResource>) -> Self {
        Self { resource }
    }

    /// The text resource handed to the created beans.
    pub fn resource(&self) -> &Arc<dyn TextResource> {
        &self.resource
    }

    /// Decorate and initialize any bean bound to `model`.
    pub fn decorate<B, M>(&self, bean: B, model: &M) -> Result<Decorated<B>, BeanError>
    where
        B: Bean,
        M: AnyModel + Clone + 'static,
    {
        let mut decorated = ErrorMessageDecorator::new(bean, model, Arc::clone(&self.resource));
        decorated.init_bean()?;
        Ok(decorated)
    }

    pub fn create_text_field(
        &self,
        model: &StringModel,
        options: FieldOptions,
    ) -> Result<Decorated<StringField>, BeanError> {
        self.decorate(TextFieldBean::with_options(model.clone(), StringCodec, options), model)
    }

    pub fn create_right_aligned_text_field(
        &self,
        model: &StringModel,
        options: FieldOptions,
    ) -> Result<Decorated<StringField>, BeanError> {
        self.create_text_field(model, options.right_aligned())
    }

    /// A text field showing `*` for every character.
    pub fn create_password_field(
        &self,
        model: &StringModel,
        columns: usize,
    ) -> Result<Decorated<StringField>, BeanError> {
        self.create_text_field(model, FieldOptions::new().columns(columns).masked(true))
    }

    /// A multi line text field.
    pub fn create_text_area(
        &self,
        model: &StringModel,
        columns: usize,
        rows: usize,
    ) -> Result<Decorated<StringField>, BeanError> {
        self.create_text_field(model, FieldOptions::new().columns(columns).rows(rows))
    }

    pub fn create_integer_field(
        &self,
        model: &IntegerModel,
        options: FieldOptions,
    ) -> Result<Decorated<TextFieldBean<Option<i64>, IntegerCodec>>, BeanError> {
        self.decorate(TextFieldBean::with_options(model.clone(), IntegerCodec, options), model)
    }

    pub fn create_double_field(
        &self,
        model: &DoubleModel,
        options: FieldOptions,
    ) -> Result<Decorated<TextFieldBean<Option<f64>, DoubleCodec>>, BeanError> {
        let codec = DoubleCodec::new(Arc::clone(&self.resource));
        self.decorate(TextFieldBean::with_options(model.clone(), codec, options), model)
    }

    /// A date field with calendar popup. An unparsable date clears the
    /// model.
    pub fn create_date_field(&self, model: &DateModel) -> Result<Decorated<DateSelectionBean>, BeanError> {
        let options = FieldOptions::new()
            .columns(10)
            .parse_failure(ParseFailurePolicy::ClearModel);
        self.create_date_field_with_options(model, options)
    }

    pub fn create_date_field_with_options(
        &self,
        model: &DateModel,
        options: FieldOptions,
    ) -> Result<Decorated<DateSelectionBean>, BeanError> {
        let bean = DateSelectionBean::new(model.clone(), Arc::clone(&self.resource), options);
        self.decorate(bean, model)
    }

    pub fn create_file_field(
        &self,
        model: &FileModel,
        chooser: Arc<dyn FileChooser>,
        filter: Option<FileFilter>,
    ) -> Result<Decorated<FileSelectionBean>, BeanError> {
        let mut bean = FileSelectionBean::new(
            model.clone(),
            chooser,
            self.resource.as_ref(),
            FieldOptions::new().columns(30),
        );
        if let Some(filter) = filter {
            bean = bean.with_filter(filter);
        }
        self.decorate(bean, model)
    }

    /// A check box without a label.
    pub fn create_check_box(&self, model: &BooleanModel) -> Result<Decorated<ToggleBean>, BeanError> {
        self.decorate(ToggleBean::check_box(model.clone(), ""), model)
    }

    /// A radio button labeled with the text resource `text_id`.
    pub fn create_radio_button(
        &self,
        text_id: &str,
        model: &BooleanModel,
    ) -> Result<Decorated<ToggleBean>, BeanError> {
        let label = self.resource.string(text_id);
        self.decorate(ToggleBean::radio_button(model.clone(), label), model)
    }

    /// Radio buttons of which at most one is selected, one per
    /// `(text_id, model)` choice.
    pub fn create_radio_button_group(
        &self,
        choices: &[(&str, &BooleanModel)],
    ) -> Result<RadioButtonGroup, BeanError> {
        let mut group = RadioButtonGroup::new();
        for &(text_id, model) in choices {
            match self.create_radio_button(text_id, model) {
                Ok(button) => group.add(button),
                Err(err) => {
                    group.close();
                    return Err(err);
                }
            }
        }
        Ok(group)
    }

    /// A combo box labeling items with `Display`.
    pub fn create_combo_box<T>(
        &self,
        model: &ListModel<T>,
    ) -> Result<Decorated<ListSelectionBean<T>>, BeanError>
    where
        T: Clone + PartialEq + fmt::Display + Send + Sync + 'static,
    {
        self.decorate(ListSelectionBean::combo_box(model.clone()), model)
    }

    /// A combo box labeling items with `formatter`.
    pub fn create_combo_box_with_formatter<T, F>(
        &self,
        model: &ListModel<T>,
        formatter: F,
    ) -> Result<Decorated<ListSelectionBean<T>>, BeanError>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let bean = ListSelectionBean::with_formatter(model.clone(), SelectionMode::Single, formatter);
        self.decorate(bean, model)
    }

    /// A list allowing any number of selected items.
    pub fn create_list<T>(&self, model: &ListModel<T>) -> Result<Decorated<ListSelectionBean<T>>, BeanError>
    where
        T: Clone + PartialEq + fmt::Display + Send + Sync + 'static,
    {
        self.decorate(ListSelectionBean::list(model.clone()), model)
    }

    /// A read-only label showing the model's text.
    pub fn create_label(
        &self,
        model: &StringModel,
    ) -> Result<Decorated<LabelBean<Option<String>, StringCodec>>, BeanError> {
        self.decorate(LabelBean::new(model.clone(), StringCodec), model)
    }
}

impl fmt::Debug for BeanFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanFactory").finish_non_exhaustive()
    }
}
