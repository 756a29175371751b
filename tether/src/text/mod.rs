//! Localized strings and locale-dependent formatting.
//!
//! Beans never format numbers or dates themselves. They ask an injected
//! [`TextResource`], so the same bean shows `1,234.50` or `1.234,50`
//! depending on the bundle it was built with.

mod bundle;
mod number;

pub use bundle::{Formats, TextBundle, TextError};

use chrono::{NaiveDate, Weekday};

use crate::error::ParseError;

/// Source of localized strings and formats.
pub trait TextResource: Send + Sync {
    /// Look up a localized string. Unknown ids resolve to the id itself.
    fn string(&self, id: &str) -> String;

    /// Look up a string and substitute `{0}`, `{1}`, ... with `args`.
    fn format_string(&self, id: &str, args: &[&str]) -> String {
        substitute(&self.string(id), args)
    }

    /// Format a number for display.
    fn format_double(&self, value: f64) -> String;

    /// Parse a number typed by the user.
    fn parse_double(&self, text: &str) -> Result<f64, ParseError>;

    /// Format a date for display.
    fn format_date(&self, date: NaiveDate) -> String;

    /// Parse a date typed by the user.
    fn parse_date(&self, text: &str) -> Result<NaiveDate, ParseError>;

    /// First column of a calendar week.
    fn first_day_of_week(&self) -> Weekday;
}

/// Replace `{n}` placeholders with the matching argument.
///
/// Placeholders without an argument are left as they are.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = template.to_string();
    for (index, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{index}}}"), arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_positional() {
        assert_eq!(substitute("{1} before {0}", &["a", "b"]), "b before a");
    }

    #[test]
    fn test_substitute_missing_argument() {
        assert_eq!(substitute("{0} and {1}", &["x"]), "x and {1}");
    }
}
