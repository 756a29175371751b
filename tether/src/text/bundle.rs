//! In-memory text resource, optionally loaded from JSON.

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{TextResource, number};
use crate::error::ParseError;

/// Error loading a [`TextBundle`].
#[derive(Debug, Error)]
pub enum TextError {
    /// The bundle is not valid JSON or has the wrong shape.
    #[error("invalid text bundle: {0}")]
    Json(#[from] serde_json::Error),
    /// The bundle could not be read.
    #[error("failed to read text bundle: {0}")]
    Io(#[from] std::io::Error),
    /// The date pattern cannot format a date.
    #[error("invalid date format {0:?}")]
    DateFormat(String),
}

/// Locale-dependent formatting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Formats {
    /// Separator between integer and fraction digits.
    pub decimal_separator: char,
    /// Separator between groups of three integer digits.
    pub grouping_separator: Option<char>,
    /// Digits shown after the decimal separator.
    pub fraction_digits: usize,
    /// `chrono` pattern used to show and parse dates.
    pub date_format: String,
    /// First column of the calendar.
    pub first_day_of_week: Weekday,
}

impl Default for Formats {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: Some(','),
            fraction_digits: 2,
            date_format: "%m/%d/%Y".to_string(),
            first_day_of_week: Weekday::Sun,
        }
    }
}

/// Strings and formats of one locale.
///
/// # Example
///
/// ```
/// use tether::text::{TextBundle, TextResource};
///
/// let bundle = TextBundle::from_json(r#"{
///     "strings": { "greeting": "Hallo {0}" },
///     "formats": { "decimalSeparator": ",", "groupingSeparator": "." }
/// }"#).unwrap();
///
/// assert_eq!(bundle.format_string("greeting", &["Welt"]), "Hallo Welt");
/// assert_eq!(bundle.format_double(1234.5), "1.234,50");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBundle {
    strings: HashMap<String, String>,
    formats: Formats,
}

const ENGLISH: &[(&str, &str)] = &[
    ("validation.fieldMustBeFilledIn", "This field must be filled in."),
    ("validation.invalidEmail", "Please enter a valid e-mail address."),
    ("validation.patternMismatch", "The value has the wrong format."),
    ("gen.close", "Close"),
    ("gen.choose", "..."),
    ("gen.calendar", "Calendar"),
    ("calendar.sun", "S"),
    ("calendar.mon", "M"),
    ("calendar.tue", "T"),
    ("calendar.wed", "W"),
    ("calendar.thu", "T"),
    ("calendar.fri", "F"),
    ("calendar.sat", "S"),
    ("taskWithProgressDialog.title", "Please wait"),
    ("taskWithProgressDialog.failed", "The operation failed: {0}"),
    ("taskWithProgressDialog.showDetails", "Show details"),
    ("taskWithProgressDialog.hideDetails", "Hide details"),
];

impl TextBundle {
    /// Create an empty bundle with default formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// The library's own English strings.
    pub fn english() -> Self {
        ENGLISH
            .iter()
            .fold(Self::new(), |bundle, (id, text)| bundle.with(*id, *text))
    }

    /// Parse a bundle from JSON.
    pub fn from_json(json: &str) -> Result<Self, TextError> {
        let bundle: Self = serde_json::from_str(json)?;
        bundle.check()
    }

    /// Read a bundle from JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self, TextError> {
        let bundle: Self = serde_json::from_reader(reader)?;
        bundle.check()
    }

    /// Add or replace one string.
    pub fn with(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.strings.insert(id.into(), text.into());
        self
    }

    /// Replace the formats.
    pub fn with_formats(mut self, formats: Formats) -> Self {
        self.formats = formats;
        self
    }

    /// Add every string of `other` that this bundle does not define.
    pub fn merged_with(mut self, other: &TextBundle) -> Self {
        for (id, text) in &other.strings {
            self.strings
                .entry(id.clone())
                .or_insert_with(|| text.clone());
        }
        self
    }

    /// The formats in use.
    pub fn formats(&self) -> &Formats {
        &self.formats
    }

    /// Whether a string with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.strings.contains_key(id)
    }

    fn check(self) -> Result<Self, TextError> {
        use std::fmt::Write;

        let mut rendered = String::new();
        let sample = NaiveDate::from_ymd_opt(2000, 1, 31).unwrap_or_default();
        if write!(rendered, "{}", sample.format(&self.formats.date_format)).is_err() {
            return Err(TextError::DateFormat(self.formats.date_format));
        }
        Ok(self)
    }
}

impl TextResource for TextBundle {
    fn string(&self, id: &str) -> String {
        match self.strings.get(id) {
            Some(text) => text.clone(),
            None => {
                log::warn!("Missing text resource '{}'", id);
                id.to_string()
            }
        }
    }

    fn format_double(&self, value: f64) -> String {
        number::format(
            value,
            self.formats.fraction_digits,
            self.formats.decimal_separator,
            self.formats.grouping_separator,
        )
    }

    fn parse_double(&self, text: &str) -> Result<f64, ParseError> {
        number::parse(
            text,
            self.formats.decimal_separator,
            self.formats.grouping_separator,
        )
    }

    fn format_date(&self, date: NaiveDate) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        if write!(out, "{}", date.format(&self.formats.date_format)).is_err() {
            log::warn!("Invalid date format {:?}", self.formats.date_format);
            return date.to_string();
        }
        out
    }

    fn parse_date(&self, text: &str) -> Result<NaiveDate, ParseError> {
        NaiveDate::parse_from_str(text.trim(), &self.formats.date_format)
            .map_err(|_| ParseError::new(text, "date"))
    }

    fn first_day_of_week(&self) -> Weekday {
        self.formats.first_day_of_week
    }
}
