//! Declarative validation rules attached to a model.

use std::path::PathBuf;

use chrono::NaiveDate;
use email_address::EmailAddress;
use regex::Regex;

use super::{ListState, StringModel};
use crate::error::ConstraintError;

/// Error id reported by `must_be_filled` for an empty value.
pub const FIELD_MUST_BE_FILLED_IN: &str = "validation.fieldMustBeFilledIn";
/// Error id reported by [`StringModel::email`] by default.
pub const INVALID_EMAIL: &str = "validation.invalidEmail";
/// Error id reported by [`StringModel::matches_pattern`] by default.
pub const PATTERN_MISMATCH: &str = "validation.patternMismatch";

/// Values that can tell whether the user has supplied something.
pub trait Filled {
    /// Whether the value counts as filled in.
    fn is_filled(&self) -> bool;
}

impl Filled for String {
    fn is_filled(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Filled> Filled for Option<T> {
    fn is_filled(&self) -> bool {
        self.as_ref().is_some_and(Filled::is_filled)
    }
}

impl Filled for i64 {
    fn is_filled(&self) -> bool {
        true
    }
}

impl Filled for f64 {
    fn is_filled(&self) -> bool {
        true
    }
}

impl Filled for u8 {
    fn is_filled(&self) -> bool {
        true
    }
}

impl Filled for NaiveDate {
    fn is_filled(&self) -> bool {
        true
    }
}

impl Filled for PathBuf {
    fn is_filled(&self) -> bool {
        !self.as_os_str().is_empty()
    }
}

impl Filled for bool {
    fn is_filled(&self) -> bool {
        *self
    }
}

impl<T> Filled for ListState<T> {
    fn is_filled(&self) -> bool {
        !self.selected().is_empty()
    }
}

type Check<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// One validation rule: an error id and the predicate that must hold.
pub(crate) struct Constraint<T> {
    error_id: String,
    check: Check<T>,
}

impl<T> Constraint<T> {
    pub(crate) fn new<F>(error_id: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            error_id: error_id.into(),
            check: Box::new(check),
        }
    }

    pub(crate) fn error_id(&self) -> &str {
        &self.error_id
    }

    pub(crate) fn is_satisfied_by(&self, value: &T) -> bool {
        (self.check)(value)
    }
}

/// Absent and empty text is left to `must_be_filled`.
fn blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

impl StringModel {
    /// Require the whole text to match `pattern`.
    ///
    /// Absent or empty text passes. On mismatch [`super::Model::validate`]
    /// reports `error_id`.
    pub fn matches_pattern(
        self,
        pattern: &str,
        error_id: impl Into<String>,
    ) -> Result<Self, ConstraintError> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(self.constraint(error_id, move |value| {
            blank(value).is_none_or(|text| regex.is_match(text))
        }))
    }

    /// Require a syntactically valid e-mail address.
    pub fn email(self, error_id: impl Into<String>) -> Self {
        self.constraint(error_id, |value| {
            blank(value).is_none_or(EmailAddress::is_valid)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_option_string() {
        assert!(!None::<String>.is_filled());
        assert!(!Some(String::new()).is_filled());
        assert!(Some("x".to_string()).is_filled());
    }

    #[test]
    fn test_filled_numbers_and_flags() {
        assert!(Some(0_i64).is_filled());
        assert!(Some(f64::NAN).is_filled());
        assert!(!false.is_filled());
        assert!(!Some(PathBuf::new()).is_filled());
    }

    #[test]
    fn test_blank_filters_empty() {
        assert_eq!(blank(&Some(String::new())), None);
        assert_eq!(blank(&Some("a".to_string())), Some("a"));
    }
}
