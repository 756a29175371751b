//! Validation of several models at once.
//!
//! ```
//! use tether::model::{IntegerModel, StringModel};
//! use tether::validation::FormValidator;
//!
//! let name = StringModel::default().must_be_filled(true);
//! let age = IntegerModel::new(Some(42)).must_be_filled(true);
//!
//! let result = FormValidator::new()
//!     .field("name", &name)
//!     .field("age", &age)
//!     .validate();
//!
//! assert!(result.is_invalid());
//! assert_eq!(result.first_error().map(|e| e.field_name.as_str()), Some("name"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::model::AnyModel;

/// Errors of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name (from the `.field()` call).
    pub field_name: String,
    /// Validation error ids reported by the field's model.
    pub error_ids: Vec<String>,
}

/// Result of validating one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed validation.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    /// Check if all fields passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any field failed validation.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all validation errors.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first validation error (if any).
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }
}

struct FieldEntry {
    name: String,
    model: Arc<dyn AnyModel>,
}

/// Builder collecting the models of a form.
///
/// [`FormValidator::validate`] validates every model, also after the first
/// failure, so each model's error ids (and the decorators showing them) are
/// up to date.
#[derive(Default)]
pub struct FormValidator {
    fields: Vec<FieldEntry>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model under a field name.
    pub fn field<M>(mut self, name: impl Into<String>, model: &M) -> Self
    where
        M: AnyModel + Clone + 'static,
    {
        self.fields.push(FieldEntry {
            name: name.into(),
            model: Arc::new(model.clone()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate all fields.
    pub fn validate(&self) -> ValidationResult {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|field| {
                if field.model.validate() {
                    None
                } else {
                    Some(FieldError {
                        field_name: field.name.clone(),
                        error_ids: field.model.error_ids(),
                    })
                }
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            log::debug!("Form validation failed for {} field(s)", errors.len());
            ValidationResult::Invalid(errors)
        }
    }
}

impl fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|field| &field.name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BooleanModel, StringModel};

    #[test]
    fn test_validates_every_field() {
        let first = StringModel::default().must_be_filled(true);
        let second = StringModel::default().must_be_filled(true);
        let result = FormValidator::new()
            .field("first", &first)
            .field("second", &second)
            .validate();

        assert_eq!(result.errors().len(), 2);
        assert!(first.has_errors());
        assert!(second.has_errors());
    }

    #[test]
    fn test_valid_form() {
        let accepted = BooleanModel::new(true).must_be_filled(true);
        let result = FormValidator::new().field("accepted", &accepted).validate();
        assert!(result.is_valid());
        assert_eq!(result.first_error(), None);
    }
}
