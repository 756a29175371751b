//! Tests for the error message decorator and the bean factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

mod common;

use tether::bean::{
    Bean, BeanFactory, BeanState, Disposable, ErrorMessageDecorator, FieldOptions, FileChooser,
    FileFilter, ParseFailurePolicy, StringCodec, TextFieldBean,
};
use tether::error::BeanError;
use tether::model::{
    BooleanModel, DateModel, DoubleModel, FIELD_MUST_BE_FILLED_IN, FileModel, IntegerModel,
    ListModel, StringModel,
};
use tether::text::{Formats, TextBundle};
use tether::widgets::{Alignment, FieldBorder, Widget};

fn factory() -> BeanFactory {
    BeanFactory::new(Arc::new(TextBundle::english()))
}

#[test]
fn test_end_to_end_scenario() {
    let model = StringModel::default().must_be_filled(true);
    let mut bean = factory()
        .create_text_field(&model, FieldOptions::new())
        .unwrap();

    assert_eq!(bean.error_text(), "");
    assert!(!bean.error_label().is_visible());

    model.validate();
    assert_eq!(bean.error_text(), "This field must be filled in.");
    assert!(bean.error_label().is_visible());

    bean.inner().field().set_text("hello");
    assert_eq!(model.get(), Some("hello".to_string()));

    model.validate();
    assert_eq!(bean.error_text(), "");
    assert!(!bean.error_label().is_visible());

    bean.close();
}

#[test]
fn test_decorator_is_transparent() {
    let model = StringModel::default().must_be_filled(true);
    let mut plain = TextFieldBean::new(model.clone(), StringCodec);
    plain.init_bean().unwrap();
    let inner = TextFieldBean::new(model.clone(), StringCodec);
    let mut decorated = ErrorMessageDecorator::new(inner, &model, Arc::new(TextBundle::english()));
    decorated.init_bean().unwrap();

    decorated.inner().field().type_text("abc");
    assert_eq!(plain.field().text(), "abc");

    model.set(Some("xyz".to_string()));
    assert_eq!(decorated.inner().field().text(), "xyz");
    assert_eq!(plain.field().text(), "xyz");

    plain.close();
    decorated.close();
}

#[test]
fn test_error_messages_are_joined() {
    let bundle = TextBundle::english().with("custom.error", "Too short.");
    let model = StringModel::default();
    let inner = TextFieldBean::new(model.clone(), StringCodec);
    let mut bean = ErrorMessageDecorator::new(inner, &model, Arc::new(bundle));
    bean.init_bean().unwrap();

    model.set_error_ids(
        vec![FIELD_MUST_BE_FILLED_IN.to_string(), "custom.error".to_string()],
        None,
    );
    assert_eq!(bean.error_text(), "This field must be filled in. Too short.");
    bean.close();
}

#[test]
fn test_existing_errors_shown_on_init() {
    let model = StringModel::default();
    model.add_error_id(FIELD_MUST_BE_FILLED_IN);
    let bean = factory().create_label(&model).unwrap();
    assert!(bean.error_label().is_visible());
}

#[test]
fn test_error_label_only_changes_with_error_text() {
    common::init_logging();
    let model = StringModel::default().must_be_filled(true);
    let mut bean = factory().create_text_field(&model, FieldOptions::new()).unwrap();
    let label = bean.error_label().clone();
    assert_eq!(label.revisions(), 0);

    model.validate();
    assert_eq!(label.revisions(), 1);
    label.clear_dirty();

    model.validate();
    model.set_enabled(false, None);
    model.set_enabled(true, None);
    model.set(Some("typed".to_string()));
    assert_eq!(label.revisions(), 1);
    assert!(!label.is_dirty());
    assert_eq!(bean.error_text(), "This field must be filled in.");

    model.validate();
    assert_eq!(label.revisions(), 2);
    assert!(!label.is_visible());
    bean.close();
}

#[test]
fn test_decorator_widget_wraps_inner_widget() {
    let model = StringModel::default();
    let bean = factory().create_text_field(&model, FieldOptions::new()).unwrap();
    let Widget::Panel(panel) = bean.widget() else {
        panic!("decorator widget is not a panel");
    };
    let children = panel.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].id(), bean.inner().field().id());
    assert_eq!(children[1].id(), bean.error_label().id());
}

#[test]
fn test_decorator_close_releases_inner_bean() {
    let model = StringModel::default();
    let mut bean = factory().create_text_field(&model, FieldOptions::new()).unwrap();
    assert_eq!(model.listener_count(), 2);

    bean.close();
    bean.close();

    assert_eq!(model.listener_count(), 0);
    assert_eq!(bean.inner().field().callback_count(), 0);
    assert_eq!(bean.state(), BeanState::Closed);
    assert_eq!(bean.inner().state(), BeanState::Closed);
}

#[test]
fn test_failed_inner_init_rolls_back() {
    let model = StringModel::default();
    let mut inner = TextFieldBean::new(model.clone(), StringCodec);
    inner.init_bean().unwrap();
    let mut bean = ErrorMessageDecorator::new(inner, &model, Arc::new(TextBundle::english()));

    assert!(matches!(bean.init_bean(), Err(BeanError::AlreadyInitialized(_))));
    assert_eq!(bean.state(), BeanState::Uninitialized);
    assert_eq!(model.listener_count(), 1);
    bean.close();
    assert_eq!(model.listener_count(), 0);
}

#[test]
fn test_factory_field_options() {
    let factory = factory();
    let model = StringModel::default();

    let right = factory
        .create_right_aligned_text_field(&model, FieldOptions::new())
        .unwrap();
    assert_eq!(right.inner().field().alignment(), Alignment::Right);

    let password = factory.create_password_field(&model, 12).unwrap();
    assert!(password.inner().field().is_masked());
    assert_eq!(password.inner().field().columns(), 12);
    password.inner().field().type_text("secret");
    assert_eq!(password.inner().field().display_text(), "******");
    assert_eq!(model.get(), Some("secret".to_string()));

    let area = factory.create_text_area(&model, 40, 5).unwrap();
    assert_eq!(area.inner().field().rows(), 5);
    assert_eq!(area.inner().field().text(), "secret");
}

#[test]
fn test_factory_numeric_fields() {
    let factory = factory();
    let integer = IntegerModel::new(Some(1234));
    let double = DoubleModel::new(Some(1234.5));

    let integer_bean = factory
        .create_integer_field(&integer, FieldOptions::new().right_aligned())
        .unwrap();
    let double_bean = factory
        .create_double_field(&double, FieldOptions::new())
        .unwrap();

    assert_eq!(integer_bean.inner().field().text(), "1234");
    assert_eq!(double_bean.inner().field().text(), "1,234.50");

    double_bean.inner().field().set_text("2,000.25");
    assert_eq!(double.get(), Some(2000.25));

    double_bean.inner().field().set_text("two");
    assert_eq!(double.get(), Some(2000.25));
    assert_eq!(double_bean.inner().field().border(), FieldBorder::Invalid);
}

#[test]
fn test_factory_uses_bundle_formats() {
    let formats = Formats {
        decimal_separator: ',',
        grouping_separator: Some('.'),
        date_format: "%d.%m.%Y".to_string(),
        ..Formats::default()
    };
    let factory = BeanFactory::new(Arc::new(TextBundle::english().with_formats(formats)));
    let double = DoubleModel::new(Some(1234.5));
    let bean = factory.create_double_field(&double, FieldOptions::new()).unwrap();
    assert_eq!(bean.inner().field().text(), "1.234,50");
}

#[test]
fn test_factory_date_field_clears_on_bad_input() {
    let model = DateModel::new(chrono::NaiveDate::from_ymd_opt(2024, 3, 9));
    let bean = factory().create_date_field(&model).unwrap();
    assert_eq!(bean.inner().field().text(), "03/09/2024");
    assert_eq!(bean.inner().field().columns(), 10);

    bean.inner().field().set_text("12/24/2024");
    assert_eq!(model.get(), chrono::NaiveDate::from_ymd_opt(2024, 12, 24));

    bean.inner().field().set_text("someday");
    assert_eq!(model.get(), None);
    assert_eq!(bean.inner().field().border(), FieldBorder::Invalid);
}

#[test]
fn test_factory_date_field_with_keep_policy() {
    let model = DateModel::new(chrono::NaiveDate::from_ymd_opt(2024, 3, 9));
    let options = FieldOptions::new().parse_failure(ParseFailurePolicy::KeepModel);
    let bean = factory()
        .create_date_field_with_options(&model, options)
        .unwrap();

    bean.inner().field().set_text("someday");
    assert_eq!(model.get(), chrono::NaiveDate::from_ymd_opt(2024, 3, 9));
}

struct FixedChooser(PathBuf);

impl FileChooser for FixedChooser {
    fn choose(&self, _current: Option<&Path>, filter: Option<&FileFilter>) -> Option<PathBuf> {
        filter
            .is_none_or(|filter| filter.accepts(&self.0))
            .then(|| self.0.clone())
    }
}

#[test]
fn test_factory_file_field() {
    let model = FileModel::default();
    let chooser = Arc::new(FixedChooser(PathBuf::from("/data/report.csv")));
    let filter = FileFilter::new("CSV", &["csv"]);
    let mut bean = factory()
        .create_file_field(&model, chooser, Some(filter))
        .unwrap();

    assert_eq!(bean.inner().choose_button().label(), "...");
    assert!(bean.inner().choose_button().click());
    assert_eq!(model.get(), Some(PathBuf::from("/data/report.csv")));
    assert_eq!(bean.inner().field().text(), "/data/report.csv");

    model.set_enabled(false, None);
    assert!(!bean.inner().choose_button().is_enabled());
    assert!(!bean.inner().choose_button().click());

    bean.close();
    assert_eq!(model.listener_count(), 0);
    assert_eq!(bean.inner().choose_button().callback_count(), 0);
}

#[test]
fn test_factory_file_field_rejected_by_filter() {
    let model = FileModel::default();
    let chooser = Arc::new(FixedChooser(PathBuf::from("notes.txt")));
    let bean = factory()
        .create_file_field(&model, chooser, Some(FileFilter::new("CSV", &["csv"])))
        .unwrap();

    bean.inner().choose_button().click();
    assert_eq!(model.get(), None);
}

#[test]
fn test_factory_toggles() {
    let factory = factory();
    let checked = BooleanModel::default();
    let radio = BooleanModel::default();

    let check_box = factory.create_check_box(&checked).unwrap();
    let radio_button = factory.create_radio_button("gen.close", &radio).unwrap();

    assert_eq!(radio_button.inner().toggle().label(), "Close");
    radio_button.inner().toggle().toggle();
    radio_button.inner().toggle().toggle();
    assert!(radio.get());

    check_box.inner().toggle().toggle();
    check_box.inner().toggle().toggle();
    assert!(!checked.get());
}

#[derive(Debug, Clone, PartialEq)]
struct Country {
    code: &'static str,
    name: &'static str,
}

#[test]
fn test_factory_combo_boxes() {
    let factory = factory();
    let model = ListModel::with_items(vec![
        Country { code: "NL", name: "Netherlands" },
        Country { code: "NO", name: "Norway" },
    ]);
    let bean = factory
        .create_combo_box_with_formatter(&model, |country: &Country| {
            format!("{} ({})", country.name, country.code)
        })
        .unwrap();

    let list = bean.inner().list_box();
    assert_eq!(list.labels(), vec!["Netherlands (NL)", "Norway (NO)"]);
    list.key_typed('w');
    assert_eq!(model.selected_item().map(|country| country.code), Some("NO"));

    let numbers = ListModel::with_items(vec![10, 20, 30]);
    let list_bean = factory.create_list(&numbers).unwrap();
    list_bean.inner().list_box().toggle_index(0);
    list_bean.inner().list_box().toggle_index(2);
    assert_eq!(numbers.selected_items(), vec![10, 30]);

    let letters = ListModel::with_items(vec!['a', 'b']);
    let combo = factory.create_combo_box(&letters).unwrap();
    letters.set_selected_index(Some(1), None);
    assert_eq!(combo.inner().list_box().selected_index(), Some(1));
}

#[test]
fn test_factory_label() {
    let model = StringModel::new(Some("status".to_string()));
    let bean = factory().create_label(&model).unwrap();
    assert_eq!(bean.inner().label().text(), "status");
}
