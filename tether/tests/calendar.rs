//! Tests for the date field and its calendar popup.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};

mod common;

use tether::bean::{Bean, CalendarView, DateSelectionBean, Disposable, FieldOptions};
use tether::model::DateModel;
use tether::text::{Formats, TextBundle};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn bundle() -> TextBundle {
    TextBundle::english()
}

#[test]
fn test_calendar_opens_on_model_date() {
    let model = DateModel::new(Some(date(2024, 3, 15)));
    let view = CalendarView::new(model, &bundle(), date(2000, 1, 1));
    assert_eq!((view.year(), view.month(), view.current_day()), (2024, 3, 15));
    assert_eq!(view.title(), "March 2024");
    assert!(view.is_open());
}

#[test]
fn test_calendar_opens_on_today_without_date() {
    let view = CalendarView::new(DateModel::default(), &bundle(), date(2023, 7, 4));
    assert_eq!(view.selected_date(), Some(date(2023, 7, 4)));
}

#[test]
fn test_grid_starts_on_sunday() {
    // March 1st 2024 is a Friday.
    let view = CalendarView::new(DateModel::new(Some(date(2024, 3, 1))), &bundle(), date(2024, 1, 1));
    let grid = view.grid();
    assert_eq!(grid[0], [None, None, None, None, None, Some(1), Some(2)]);
    assert_eq!(grid[1][0], Some(3));
    assert_eq!(grid[5][0], Some(31));
    assert_eq!(grid[5][1], None);
    assert_eq!(view.weekday_initials(), ["S", "M", "T", "W", "T", "F", "S"]);
}

#[test]
fn test_grid_honors_first_day_of_week() {
    let formats = Formats {
        first_day_of_week: Weekday::Mon,
        ..Formats::default()
    };
    let resource = bundle().with_formats(formats);
    let view = CalendarView::new(DateModel::new(Some(date(2024, 3, 1))), &resource, date(2024, 1, 1));
    let grid = view.grid();
    assert_eq!(grid[0], [None, None, None, None, Some(1), Some(2), Some(3)]);
    assert_eq!(grid[4][6], Some(31));
    assert!(grid[5].iter().all(Option::is_none));
    assert_eq!(view.weekday_initials()[0], "M");
}

#[test]
fn test_day_is_clamped_to_month_length() {
    let view = CalendarView::new(DateModel::new(Some(date(2024, 1, 31))), &bundle(), date(2024, 1, 1));

    view.next_month();
    assert_eq!((view.month(), view.current_day()), (2, 29));

    view.set_year(2023);
    assert_eq!(view.current_day(), 28);

    view.set_month(13);
    assert_eq!(view.month(), 2);

    assert!(!view.select_day(30));
    assert!(view.select_day(14));
    assert_eq!(view.selected_date(), Some(date(2023, 2, 14)));
}

#[test]
fn test_month_navigation_wraps_years() {
    let view = CalendarView::new(DateModel::new(Some(date(2024, 12, 10))), &bundle(), date(2024, 1, 1));
    view.next_month();
    assert_eq!((view.year(), view.month()), (2025, 1));
    view.previous_month();
    view.previous_month();
    assert_eq!((view.year(), view.month()), (2024, 11));
}

#[test]
fn test_confirm_writes_model_and_cancel_does_not() {
    let model = DateModel::new(Some(date(2024, 3, 15)));
    let view = CalendarView::new(model.clone(), &bundle(), date(2024, 1, 1));
    view.select_day(20);
    view.cancel();
    assert_eq!(model.get(), Some(date(2024, 3, 15)));
    assert!(!view.is_open());

    let view = CalendarView::new(model.clone(), &bundle(), date(2024, 1, 1));
    view.select_day(20);
    view.confirm();
    assert_eq!(model.get(), Some(date(2024, 3, 20)));
    assert!(!view.is_open());

    // A closed view no longer writes.
    view.select_day(21);
    view.confirm();
    assert_eq!(model.get(), Some(date(2024, 3, 20)));
}

#[test]
fn test_date_bean_calendar_updates_field() {
    let model = DateModel::new(Some(date(2024, 3, 15)));
    let mut bean = DateSelectionBean::new(model.clone(), Arc::new(bundle()), FieldOptions::new());
    bean.init_bean().unwrap();
    assert_eq!(bean.field().text(), "03/15/2024");
    assert_eq!(bean.calendar_button().label(), "Calendar");
    assert!(bean.calendar().is_none());

    assert!(bean.calendar_button().click());
    let view = bean.calendar().unwrap();
    view.next_month();
    view.select_day(2);
    view.confirm();

    assert_eq!(model.get(), Some(date(2024, 4, 2)));
    assert_eq!(bean.field().text(), "04/02/2024");
    assert!(bean.calendar().is_none());

    bean.close();
    assert_eq!(model.listener_count(), 0);
    assert_eq!(bean.calendar_button().callback_count(), 0);
}

#[test]
fn test_date_bean_button_follows_enabled() {
    let model = DateModel::default();
    let mut bean = DateSelectionBean::new(model.clone(), Arc::new(bundle()), FieldOptions::new());
    bean.init_bean().unwrap();

    model.set_enabled(false, None);
    assert!(!bean.calendar_button().is_enabled());
    assert!(!bean.field().is_enabled());
    assert!(!bean.calendar_button().click());
    assert!(bean.calendar().is_none());

    model.set_enabled(true, None);
    assert!(bean.calendar_button().is_enabled());
}

#[test]
fn test_closing_date_bean_cancels_popup() {
    let model = DateModel::new(Some(date(2024, 3, 15)));
    let mut bean = DateSelectionBean::new(model.clone(), Arc::new(bundle()), FieldOptions::new());
    bean.init_bean().unwrap();
    let view = bean.open_calendar();

    bean.close();

    assert!(!view.is_open());
    view.confirm();
    assert_eq!(model.get(), Some(date(2024, 3, 15)));
}

#[test]
fn test_navigation_stops_at_calendar_limits() {
    common::init_logging();
    let model = DateModel::new(Some(NaiveDate::MAX));
    let view = CalendarView::new(model.clone(), &bundle(), date(2024, 1, 1));
    let (year, month) = (view.year(), view.month());
    assert_eq!((year, month), (NaiveDate::MAX.year(), 12));

    view.next_month();
    assert_eq!((view.year(), view.month()), (year, month));
    assert_eq!(view.selected_date(), Some(NaiveDate::MAX));

    view.previous_month();
    assert_eq!(view.month(), month - 1);
    view.confirm();
    // December 31st becomes November 30th.
    assert_eq!(model.get(), Some(date(year, 11, 30)));

    let model = DateModel::new(Some(NaiveDate::MIN));
    let view = CalendarView::new(model.clone(), &bundle(), date(2024, 1, 1));
    view.previous_month();
    assert_eq!(view.selected_date(), Some(NaiveDate::MIN));
    view.confirm();
    assert_eq!(model.get(), Some(NaiveDate::MIN));
}
