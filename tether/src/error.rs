//! Error types shared across the crate.

use std::any::Any;

use thiserror::Error;

/// Misuse of the bean lifecycle.
///
/// A bean moves `Uninitialized -> Active -> Closed`. Calling
/// [`Bean::init_bean`](crate::bean::Bean::init_bean) out of order is a
/// programmer error and reported through this type rather than ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeanError {
    /// `init_bean` was called on a bean that is already active.
    #[error("bean '{0}' is already initialized")]
    AlreadyInitialized(String),
    /// `init_bean` was called on a bean that has been closed.
    #[error("bean '{0}' has been closed")]
    Closed(String),
}

/// User text that a codec could not turn into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {input:?} as {expected}")]
pub struct ParseError {
    /// The raw text that was entered.
    pub input: String,
    /// Human readable name of the expected kind of value.
    pub expected: &'static str,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(input: impl Into<String>, expected: &'static str) -> Self {
        Self {
            input: input.into(),
            expected,
        }
    }
}

/// An invalid constraint declaration on a model.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// The pattern passed to `matches_pattern` is not a valid regex.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A background task that did not deliver a result.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task returned an error.
    #[error("task failed: {message}")]
    Failed {
        /// The error's display text.
        message: String,
        /// The error's debug text.
        detail: String,
    },
    /// The task panicked.
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The worker thread could not be started.
    #[error("cannot start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl TaskError {
    /// Short text for the user.
    pub fn message(&self) -> String {
        match self {
            TaskError::Failed { message, .. } => message.clone(),
            TaskError::Panicked(message) => message.clone(),
            TaskError::Spawn(err) => err.to_string(),
        }
    }

    /// Technical detail, shown on request.
    pub fn detail(&self) -> String {
        match self {
            TaskError::Failed { detail, .. } => detail.clone(),
            TaskError::Panicked(message) => format!("panicked: {message}"),
            TaskError::Spawn(err) => format!("{err:?}"),
        }
    }
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
