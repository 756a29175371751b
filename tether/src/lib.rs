//! Data binding between observable models and input widgets.
//!
//! A [`Model`](model::Model) holds a value, an enabled flag and validation
//! error ids. A [`Bean`](bean::Bean) binds one model to one host widget and
//! keeps both in sync without feedback loops. The
//! [`BeanFactory`](bean::BeanFactory) builds beans wrapped in an
//! [`ErrorMessageDecorator`](bean::ErrorMessageDecorator) that shows the
//! model's validation errors.
//!
//! ```
//! use std::sync::Arc;
//!
//! use tether::prelude::*;
//!
//! let factory = BeanFactory::new(Arc::new(TextBundle::english()));
//! let age = IntegerModel::default();
//! let mut field = factory.create_integer_field(&age, FieldOptions::new()).unwrap();
//!
//! field.inner().field().type_text("42");
//! assert_eq!(age.get(), Some(42));
//!
//! age.set(Some(7));
//! assert_eq!(field.inner().field().text(), "7");
//! field.close();
//! ```

pub mod bean;
pub mod error;
pub mod model;
pub mod task;
pub mod text;
pub mod validation;
pub mod widgets;

pub mod prelude {
    pub use crate::bean::{
        Bean, BeanFactory, BeanState, Closeables, Disposable, ErrorMessageDecorator, FieldOptions,
        FileChooser, FileFilter, ParseFailurePolicy, RadioButtonGroup, TextCodec,
    };
    pub use crate::error::{BeanError, ParseError, TaskError};
    pub use crate::model::{
        AnyModel, BooleanModel, DateModel, DoubleModel, FileModel, IntegerModel, ListModel,
        ListState, ListenerId, Model, StringModel,
    };
    pub use crate::task::{ProgressListener, TaskWithProgress};
    pub use crate::text::{TextBundle, TextResource};
    pub use crate::validation::{FormValidator, ValidationResult};
    pub use crate::widgets::{SelectionMode, Widget};
}
