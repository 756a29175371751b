//! Date field with a calendar popup.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Datelike, Local, NaiveDate, Weekday};

use super::{Bean, BeanState, DateCodec, Disposable, FieldOptions, Lifecycle, TextFieldBean};
use crate::error::BeanError;
use crate::model::{DateModel, ListenerId, WeakModel};
use crate::text::TextResource;
use crate::widgets::{Button, Panel, TextField, Widget};

/// Rows of the day grid.
pub const GRID_ROWS: usize = 6;
/// Columns of the day grid, one per weekday.
pub const GRID_COLUMNS: usize = 7;

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

#[derive(Debug)]
struct CalendarState {
    year: i32,
    /// 1 to 12
    month: u32,
    /// Day highlighted in the grid, always valid for the month
    day: u32,
    open: bool,
}

impl CalendarState {
    fn clamp_day(&mut self) {
        self.day = self.day.min(days_in_month(self.year, self.month));
    }

    fn show(&mut self, year: i32, month: u32) {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            log::trace!("Calendar cannot show {}-{:02}", year, month);
            return;
        }
        self.year = year;
        self.month = month;
        self.clamp_day();
    }
}

/// A month view for picking a date.
///
/// Opens on the model's date, or on today when the model is empty. The
/// chosen date is only written to the model by [`CalendarView::confirm`].
#[derive(Clone)]
pub struct CalendarView {
    model: DateModel,
    first_day: Weekday,
    initials: Vec<String>,
    state: Arc<Mutex<CalendarState>>,
}

impl CalendarView {
    /// Open a calendar for `model`, falling back to `today`.
    pub fn new(model: DateModel, resource: &dyn TextResource, today: NaiveDate) -> Self {
        let start = model.get().unwrap_or(today);
        let first_day = resource.first_day_of_week();
        let mut initials = Vec::with_capacity(GRID_COLUMNS);
        let mut weekday = first_day;
        for _ in 0..GRID_COLUMNS {
            let id = format!("calendar.{}", weekday.to_string().to_lowercase());
            initials.push(resource.string(&id));
            weekday = weekday.succ();
        }
        Self {
            model,
            first_day,
            initials,
            state: Arc::new(Mutex::new(CalendarState {
                year: start.year(),
                month: start.month(),
                day: start.day(),
                open: true,
            })),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut CalendarState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn year(&self) -> i32 {
        self.with_state(|state| state.year)
    }

    /// Shown month, 1 to 12.
    pub fn month(&self) -> u32 {
        self.with_state(|state| state.month)
    }

    /// Highlighted day of the shown month.
    pub fn current_day(&self) -> u32 {
        self.with_state(|state| state.day)
    }

    /// Title such as `March 2024`.
    pub fn title(&self) -> String {
        self.with_state(|state| {
            NaiveDate::from_ymd_opt(state.year, state.month, 1)
                .map(|first| first.format("%B %Y").to_string())
                .unwrap_or_default()
        })
    }

    /// Show another month of the same year. Months outside 1 to 12 are
    /// ignored.
    pub fn set_month(&self, month: u32) {
        if !(1..=12).contains(&month) {
            return;
        }
        self.with_state(|state| {
            state.month = month;
            state.clamp_day();
        });
    }

    /// Show the same month in another year.
    pub fn set_year(&self, year: i32) {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return;
        }
        self.with_state(|state| {
            state.year = year;
            state.clamp_day();
        });
    }

    /// Show the following month. Does nothing past the last representable
    /// month.
    pub fn next_month(&self) {
        self.with_state(|state| {
            let (year, month) = if state.month == 12 {
                (state.year + 1, 1)
            } else {
                (state.year, state.month + 1)
            };
            state.show(year, month);
        });
    }

    /// Show the preceding month. Does nothing before the first
    /// representable month.
    pub fn previous_month(&self) {
        self.with_state(|state| {
            let (year, month) = if state.month == 1 {
                (state.year - 1, 12)
            } else {
                (state.year, state.month - 1)
            };
            state.show(year, month);
        });
    }

    /// Highlight a day. Returns false for a day the month does not have.
    pub fn select_day(&self, day: u32) -> bool {
        self.with_state(|state| {
            if day == 0 || day > days_in_month(state.year, state.month) {
                return false;
            }
            state.day = day;
            true
        })
    }

    /// Weekday initials in column order.
    pub fn weekday_initials(&self) -> &[String] {
        &self.initials
    }

    /// Day numbers of the shown month laid out by week. Cells before the
    /// first and after the last day are `None`.
    pub fn grid(&self) -> [[Option<u32>; GRID_COLUMNS]; GRID_ROWS] {
        let (year, month) = self.with_state(|state| (state.year, state.month));
        let mut grid = [[None; GRID_COLUMNS]; GRID_ROWS];
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return grid;
        };
        let offset = (first.weekday().num_days_from_monday() + 7
            - self.first_day.num_days_from_monday())
            % 7;
        for day in 1..=days_in_month(year, month) {
            let cell = (offset + day - 1) as usize;
            grid[cell / GRID_COLUMNS][cell % GRID_COLUMNS] = Some(day);
        }
        grid
    }

    /// The highlighted date.
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.with_state(|state| NaiveDate::from_ymd_opt(state.year, state.month, state.day))
    }

    pub fn is_open(&self) -> bool {
        self.with_state(|state| state.open)
    }

    /// Write the highlighted date to the model and close. Without a valid
    /// highlighted date nothing happens.
    pub fn confirm(&self) {
        if !self.is_open() {
            return;
        }
        let Some(date) = self.selected_date() else {
            log::warn!("Calendar has no valid date to confirm");
            return;
        };
        log::debug!("Calendar confirmed {}", date);
        self.model.set(Some(date));
        self.with_state(|state| state.open = false);
    }

    /// Close without touching the model.
    pub fn cancel(&self) {
        self.with_state(|state| state.open = false);
    }
}

impl fmt::Debug for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("CalendarView")
            .field("year", &state.year)
            .field("month", &state.month)
            .field("day", &state.day)
            .field("open", &state.open)
            .finish()
    }
}

type CalendarSlot = Arc<Mutex<Option<CalendarView>>>;

/// A date text field plus a button that opens a [`CalendarView`].
pub struct DateSelectionBean {
    text: TextFieldBean<Option<NaiveDate>, DateCodec>,
    button: Button,
    panel: Panel,
    resource: Arc<dyn TextResource>,
    calendar: CalendarSlot,
    lifecycle: Lifecycle,
    model_listener: Option<ListenerId>,
    button_callback: Option<ListenerId>,
}

impl DateSelectionBean {
    pub fn new(model: DateModel, resource: Arc<dyn TextResource>, options: FieldOptions) -> Self {
        let text = TextFieldBean::with_options(model, DateCodec::new(Arc::clone(&resource)), options);
        let button = Button::new(resource.string("gen.calendar"));
        let panel = Panel::row([text.widget(), Widget::Button(button.clone())]);
        Self {
            lifecycle: Lifecycle::new(format!("date field {}", text.field().id())),
            text,
            button,
            panel,
            resource,
            calendar: Arc::new(Mutex::new(None)),
            model_listener: None,
            button_callback: None,
        }
    }

    pub fn field(&self) -> &TextField {
        self.text.field()
    }

    pub fn calendar_button(&self) -> &Button {
        &self.button
    }

    pub fn model(&self) -> &DateModel {
        self.text.model()
    }

    /// Open the calendar popup, replacing one that is already open.
    pub fn open_calendar(&self) -> CalendarView {
        open_calendar(self.text.model(), self.resource.as_ref(), &self.calendar)
    }

    /// The popup, while it is open.
    pub fn calendar(&self) -> Option<CalendarView> {
        self.calendar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(CalendarView::is_open)
    }
}

fn open_calendar(model: &DateModel, resource: &dyn TextResource, slot: &CalendarSlot) -> CalendarView {
    let view = CalendarView::new(model.clone(), resource, Local::now().date_naive());
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(view.clone());
    view
}

impl Bean for DateSelectionBean {
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
        let resource = Arc::clone(&self.resource);
        let slot = Arc::clone(&self.calendar);
        self.button_callback = Some(self.button.on_click(move |_| {
            if let Some(model) = model.upgrade() {
                open_calendar(&model, resource.as_ref(), &slot);
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

impl Disposable for DateSelectionBean {
    fn close(&mut self) {
        if !self.lifecycle.close() {
            return;
        }
        if let Some(view) = self.calendar() {
            view.cancel();
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

impl fmt::Debug for DateSelectionBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateSelectionBean")
            .field("text", &self.text)
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
