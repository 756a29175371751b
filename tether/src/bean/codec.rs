//! Conversion between model values and the text shown in a field.

use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::ParseError;
use crate::text::TextResource;

/// Parse and format strategy of a text field bean.
///
/// `parse(format(v))` must give back `v` for every value the codec
/// produces. Empty text conventionally parses to the absent value.
pub trait TextCodec<T>: Send + Sync {
    /// Text shown for `value`.
    fn format(&self, value: &T) -> String;

    /// Value for the text the user entered.
    fn parse(&self, text: &str) -> Result<T, ParseError>;
}

/// Free text. Empty text is `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl TextCodec<Option<String>> for StringCodec {
    fn format(&self, value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }

    fn parse(&self, text: &str) -> Result<Option<String>, ParseError> {
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}

/// Whole numbers. Surrounding whitespace is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerCodec;

impl TextCodec<Option<i64>> for IntegerCodec {
    fn format(&self, value: &Option<i64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    fn parse(&self, text: &str) -> Result<Option<i64>, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse()
            .map(Some)
            .map_err(|_| ParseError::new(text, "integer"))
    }
}

/// Decimal numbers in the format of a [`TextResource`].
#[derive(Clone)]
pub struct DoubleCodec {
    resource: Arc<dyn TextResource>,
}

impl DoubleCodec {
    pub fn new(resource: Arc<dyn TextResource>) -> Self {
        Self { resource }
    }
}

impl TextCodec<Option<f64>> for DoubleCodec {
    fn format(&self, value: &Option<f64>) -> String {
        value
            .map(|v| self.resource.format_double(v))
            .unwrap_or_default()
    }

    fn parse(&self, text: &str) -> Result<Option<f64>, ParseError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.resource.parse_double(text).map(Some)
    }
}

impl fmt::Debug for DoubleCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleCodec").finish_non_exhaustive()
    }
}

/// Dates in the format of a [`TextResource`].
#[derive(Clone)]
pub struct DateCodec {
    resource: Arc<dyn TextResource>,
}

impl DateCodec {
    pub fn new(resource: Arc<dyn TextResource>) -> Self {
        Self { resource }
    }
}

impl TextCodec<Option<NaiveDate>> for DateCodec {
    fn format(&self, value: &Option<NaiveDate>) -> String {
        value
            .map(|date| self.resource.format_date(date))
            .unwrap_or_default()
    }

    fn parse(&self, text: &str) -> Result<Option<NaiveDate>, ParseError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.resource.parse_date(text).map(Some)
    }
}

impl fmt::Debug for DateCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateCodec").finish_non_exhaustive()
    }
}

/// File system paths, taken verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCodec;

impl TextCodec<Option<PathBuf>> for PathCodec {
    fn format(&self, value: &Option<PathBuf>) -> String {
        value
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    }

    fn parse(&self, text: &str) -> Result<Option<PathBuf>, ParseError> {
        Ok((!text.is_empty()).then(|| PathBuf::from(text)))
    }
}

/// A codec built from two closures.
///
/// ```
/// use tether::bean::{FnCodec, TextCodec};
/// use tether::error::ParseError;
///
/// let codec = FnCodec::new(
///     |v: &Option<u8>| v.map(|v| format!("{v}%")).unwrap_or_default(),
///     |text: &str| match text.trim_end_matches('%') {
///         "" => Ok(None),
///         digits => digits.parse().map(Some).map_err(|_| ParseError::new(text, "percentage")),
///     },
/// );
/// assert_eq!(codec.parse("42%"), Ok(Some(42)));
/// assert_eq!(codec.format(&Some(7)), "7%");
/// ```
pub struct FnCodec<T, F, P> {
    format: F,
    parse: P,
    _value: PhantomData<fn() -> T>,
}

impl<T, F, P> FnCodec<T, F, P>
where
    F: Fn(&T) -> String + Send + Sync,
    P: Fn(&str) -> Result<T, ParseError> + Send + Sync,
{
    pub fn new(format: F, parse: P) -> Self {
        Self {
            format,
            parse,
            _value: PhantomData,
        }
    }
}

impl<T, F, P> TextCodec<T> for FnCodec<T, F, P>
where
    F: Fn(&T) -> String + Send + Sync,
    P: Fn(&str) -> Result<T, ParseError> + Send + Sync,
{
    fn format(&self, value: &T) -> String {
        (self.format)(value)
    }

    fn parse(&self, text: &str) -> Result<T, ParseError> {
        (self.parse)(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_codec_trims() {
        assert_eq!(IntegerCodec.parse(" 42 "), Ok(Some(42)));
        assert_eq!(IntegerCodec.parse("   "), Ok(None));
        assert!(IntegerCodec.parse("4 2").is_err());
    }

    #[test]
    fn test_string_codec_keeps_whitespace() {
        assert_eq!(StringCodec.parse(" a "), Ok(Some(" a ".to_string())));
        assert_eq!(StringCodec.parse(""), Ok(None));
        assert_eq!(StringCodec.format(&None), "");
    }

    #[test]
    fn test_path_codec() {
        assert_eq!(PathCodec.parse("/tmp/x"), Ok(Some(PathBuf::from("/tmp/x"))));
        assert_eq!(PathCodec.format(&None), "");
    }
}
