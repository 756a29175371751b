//! A registration form built from beans.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tether::bean::{
    DateSelectionBean, Decorated, FileSelectionBean, IntegerCodec, ListSelectionBean, StringCodec,
    TextFieldBean, ToggleBean,
};
use tether::model::INVALID_EMAIL;
use tether::prelude::*;

/// Chooser that always picks the same file, standing in for a dialog.
struct ScriptedChooser {
    path: PathBuf,
}

impl FileChooser for ScriptedChooser {
    fn choose(&self, current: Option<&Path>, filter: Option<&FileFilter>) -> Option<PathBuf> {
        log::debug!("Chooser opened at {:?}", current);
        match filter {
            Some(filter) if !filter.accepts(&self.path) => None,
            _ => Some(self.path.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Belgium,
    Germany,
    Netherlands,
    Norway,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Country::Belgium => "Belgium",
            Country::Germany => "Germany",
            Country::Netherlands => "Netherlands",
            Country::Norway => "Norway",
        };
        write!(f, "{name}")
    }
}

/// The models of the form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: StringModel,
    pub email: StringModel,
    pub age: IntegerModel,
    pub birthday: DateModel,
    pub country: ListModel<Country>,
    pub newsletter: BooleanModel,
    pub contact_by_email: BooleanModel,
    pub contact_by_phone: BooleanModel,
    pub attachment: FileModel,
}

impl Registration {
    pub fn new() -> Self {
        Self {
            name: StringModel::default().must_be_filled(true),
            email: StringModel::default()
                .must_be_filled(true)
                .email(INVALID_EMAIL),
            age: IntegerModel::default().constraint("demo.ageOutOfRange", |age| {
                age.is_none_or(|years| (0..=150).contains(&years))
            }),
            birthday: DateModel::default(),
            country: ListModel::with_items(vec![
                Country::Belgium,
                Country::Germany,
                Country::Netherlands,
                Country::Norway,
            ])
            .must_be_filled(true),
            newsletter: BooleanModel::default(),
            contact_by_email: BooleanModel::new(true),
            contact_by_phone: BooleanModel::default(),
            attachment: FileModel::default(),
        }
    }

    pub fn validator(&self) -> FormValidator {
        FormValidator::new()
            .field("name", &self.name)
            .field("email", &self.email)
            .field("age", &self.age)
            .field("country", &self.country)
    }
}

impl Default for Registration {
    fn default() -> Self {
        Self::new()
    }
}

/// The beans showing a [`Registration`].
pub struct RegistrationView {
    pub name: Decorated<TextFieldBean<Option<String>, StringCodec>>,
    pub email: Decorated<TextFieldBean<Option<String>, StringCodec>>,
    pub age: Decorated<TextFieldBean<Option<i64>, IntegerCodec>>,
    pub birthday: Decorated<DateSelectionBean>,
    pub country: Decorated<ListSelectionBean<Country>>,
    pub attachment: Decorated<FileSelectionBean>,
    pub newsletter: Decorated<ToggleBean>,
    pub contact: RadioButtonGroup,
    closeables: Closeables,
}

impl RegistrationView {
    pub fn new(factory: &BeanFactory, form: &Registration) -> Result<Self, BeanError> {
        let chooser = Arc::new(ScriptedChooser {
            path: env::temp_dir().join("cv.pdf"),
        });
        let mut closeables = Closeables::new();
        // Read-only echo of the name, closed with the view.
        closeables.add(factory.create_label(&form.name)?);

        Ok(Self {
            name: factory.create_text_field(&form.name, FieldOptions::new().columns(30))?,
            email: factory.create_text_field(&form.email, FieldOptions::new().columns(30))?,
            age: factory.create_integer_field(&form.age, FieldOptions::new().columns(3).right_aligned())?,
            birthday: factory.create_date_field(&form.birthday)?,
            country: factory.create_combo_box(&form.country)?,
            attachment: factory.create_file_field(
                &form.attachment,
                chooser,
                Some(FileFilter::new("Documents", &["pdf", "odt"])),
            )?,
            newsletter: factory.create_radio_button("demo.newsletter", &form.newsletter)?,
            contact: factory.create_radio_button_group(&[
                ("demo.contactByEmail", &form.contact_by_email),
                ("demo.contactByPhone", &form.contact_by_phone),
            ])?,
            closeables,
        })
    }

    /// Widgets in form order.
    pub fn widgets(&self) -> Vec<Widget> {
        vec![
            self.name.widget(),
            self.email.widget(),
            self.age.widget(),
            self.birthday.widget(),
            self.country.widget(),
            self.attachment.widget(),
            self.newsletter.widget(),
            self.contact.widget(),
        ]
    }
}

impl Disposable for RegistrationView {
    fn close(&mut self) {
        self.contact.close();
        self.newsletter.close();
        self.attachment.close();
        self.country.close();
        self.birthday.close();
        self.age.close();
        self.email.close();
        self.name.close();
        self.closeables.close();
    }
}

/// The birthday the script picks in the calendar.
pub fn scripted_birthday() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1990, 6, 14)
}
