//! Running work off the UI thread while showing its progress.
//!
//! [`TaskWithProgress::execute`] starts the task on a named worker thread
//! and blocks the calling thread until it is done. Meanwhile progress
//! reports travel back over a channel and are applied on the calling
//! thread, so the [`ProgressDialog`] model is only touched there.

mod dialog;

pub use dialog::{ErrorReport, ProgressDialog};

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tokio::sync::mpsc;

use crate::bean::Disposable;
use crate::error::{TaskError, extract_panic_message};
use crate::text::TextResource;

/// Receives progress reports from a running task.
pub trait ProgressListener {
    /// Report the completed percentage, 0 to 100.
    fn on_progress_update(&self, percent: u8);
}

enum Message {
    Progress(u8),
    Finished(Result<(), TaskError>),
}

struct ChannelProgress {
    tx: mpsc::UnboundedSender<Message>,
}

impl ProgressListener for ChannelProgress {
    fn on_progress_update(&self, percent: u8) {
        if self.tx.send(Message::Progress(percent)).is_err() {
            log::trace!("Progress {}% dropped, nobody is listening", percent);
        }
    }
}

/// Executes tasks while a [`ProgressDialog`] shows their progress.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use tether::task::TaskWithProgress;
/// use tether::text::TextBundle;
///
/// let runner = TaskWithProgress::new("Counting", Arc::new(TextBundle::english()));
/// let total = runner
///     .execute(|progress| {
///         let mut total = 0u32;
///         for step in 1..=4u8 {
///             total += u32::from(step);
///             progress.on_progress_update(step * 25);
///         }
///         Ok::<_, std::io::Error>(total)
///     })
///     .unwrap();
///
/// assert_eq!(total, 10);
/// assert_eq!(runner.dialog().progress_bar().value(), 100);
/// ```
pub struct TaskWithProgress {
    description: String,
    resource: Arc<dyn TextResource>,
    dialog: ProgressDialog,
    report: Mutex<Option<ErrorReport>>,
}

impl TaskWithProgress {
    pub fn new(description: impl Into<String>, resource: Arc<dyn TextResource>) -> Self {
        let description = description.into();
        Self {
            dialog: ProgressDialog::new(
                resource.string("taskWithProgressDialog.title"),
                description.clone(),
            ),
            description,
            resource,
            report: Mutex::new(None),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dialog(&self) -> &ProgressDialog {
        &self.dialog
    }

    /// Report of the last failed execution, cleared when the next one
    /// starts.
    pub fn error_report(&self) -> Option<ErrorReport> {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `task` on a worker thread and wait for its result.
    ///
    /// The dialog is visible while the task runs. An error or panic of the
    /// task is logged, turned into a [`TaskError`] and shown as an
    /// [`ErrorReport`].
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous runtime, since the
    /// calling thread blocks on the progress channel.
    pub fn execute<R, E, F>(&self, task: F) -> Result<R, TaskError>
    where
        F: FnOnce(&dyn ProgressListener) -> Result<R, E> + Send,
        R: Send,
        E: fmt::Display + fmt::Debug,
    {
        *self.report.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.dialog.show();
        let slot: Mutex<Option<R>> = Mutex::new(None);

        let outcome = thread::scope(|scope| -> Result<(), TaskError> {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let result = &slot;
            let worker = move || {
                let progress = ChannelProgress { tx };
                let listener: &dyn ProgressListener = &progress;
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task(listener))) {
                    Ok(Ok(value)) => {
                        *result.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
                        Ok(())
                    }
                    Ok(Err(err)) => Err(TaskError::Failed {
                        message: err.to_string(),
                        detail: format!("{err:?}"),
                    }),
                    Err(panic) => Err(TaskError::Panicked(extract_panic_message(&panic))),
                };
                let _ = progress.tx.send(Message::Finished(outcome));
            };
            thread::Builder::new()
                .name(format!("worker thread for \"{}\"", self.description))
                .spawn_scoped(scope, worker)?;

            let mut outcome = Err(TaskError::Panicked(
                "worker thread ended without a result".to_string(),
            ));
            while let Some(message) = rx.blocking_recv() {
                match message {
                    Message::Progress(percent) => self.dialog.update(percent),
                    Message::Finished(finished) => {
                        outcome = finished;
                        break;
                    }
                }
            }
            outcome
        });
        self.dialog.hide();

        let value = outcome.and_then(|()| {
            slot.into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .ok_or_else(|| TaskError::Panicked("result slot is empty".to_string()))
        });
        if let Err(err) = &value {
            log::error!("Task \"{}\" failed: {}", self.description, err);
            *self.report.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(ErrorReport::new(err, self.resource.as_ref()));
        }
        value
    }
}

impl Disposable for TaskWithProgress {
    fn close(&mut self) {
        self.dialog.hide();
        self.dialog.unbind();
    }
}

impl fmt::Debug for TaskWithProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskWithProgress")
            .field("description", &self.description)
            .field("dialog", &self.dialog)
            .finish_non_exhaustive()
    }
}
