//! Tests for background tasks with progress.

use std::fmt;
use std::sync::{Arc, Mutex};

mod common;

use tether::bean::Disposable;
use tether::error::TaskError;
use tether::task::TaskWithProgress;
use tether::text::TextBundle;

fn runner(description: &str) -> TaskWithProgress {
    TaskWithProgress::new(description, Arc::new(TextBundle::english()))
}

#[derive(Debug)]
struct ImportError {
    line: usize,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad record on line {}", self.line)
    }
}

#[test]
fn test_task_result_and_progress() {
    let runner = runner("Importing");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    runner
        .dialog()
        .percentage()
        .add_listener(move |model| log.lock().unwrap().push(model.get()));

    let result = runner.execute(|progress| {
        for percent in [10, 50, 100] {
            progress.on_progress_update(percent);
        }
        Ok::<_, ImportError>("done")
    });

    assert_eq!(result.unwrap(), "done");
    assert_eq!(*seen.lock().unwrap(), vec![10, 50, 100]);
    assert_eq!(runner.dialog().progress_bar().value(), 100);
    assert!(!runner.dialog().is_visible());
    assert!(runner.error_report().is_none());
}

#[test]
fn test_task_runs_on_named_worker_thread() {
    let runner = runner("Counting");
    let name = runner
        .execute(|_| Ok::<_, ImportError>(std::thread::current().name().map(str::to_string)))
        .unwrap();
    assert_eq!(name.as_deref(), Some("worker thread for \"Counting\""));
}

#[test]
fn test_task_may_borrow_from_caller() {
    let runner = runner("Summing");
    let numbers = vec![1, 2, 3, 4];
    let sum = runner
        .execute(|_| Ok::<_, ImportError>(numbers.iter().sum::<i32>()))
        .unwrap();
    assert_eq!(sum, 10);
    assert_eq!(numbers.len(), 4);
}

#[test]
fn test_failed_task_produces_report() {
    common::init_logging();
    let runner = runner("Importing");
    let result = runner.execute(|progress| {
        progress.on_progress_update(30);
        Err::<(), _>(ImportError { line: 7 })
    });

    match result {
        Err(TaskError::Failed { message, detail }) => {
            assert_eq!(message, "bad record on line 7");
            assert_eq!(detail, "ImportError { line: 7 }");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let report = runner.error_report().unwrap();
    assert_eq!(report.message(), "The operation failed: bad record on line 7");
    assert_eq!(report.detail(), "ImportError { line: 7 }");
    assert!(!report.details_visible());
    report.toggle_details();
    assert!(report.details_visible());
    assert!(!runner.dialog().is_visible());
}

#[test]
fn test_panicking_task_produces_report() {
    let runner = runner("Exploding");
    let result = runner.execute(|_| -> Result<(), ImportError> { panic!("out of cheese") });

    assert!(matches!(result, Err(TaskError::Panicked(ref message)) if message == "out of cheese"));
    assert!(runner.error_report().is_some());
}

#[test]
fn test_next_execution_clears_report() {
    let runner = runner("Retrying");
    let _ = runner.execute(|_| Err::<(), _>(ImportError { line: 1 }));
    assert!(runner.error_report().is_some());

    runner.execute(|_| Ok::<_, ImportError>(())).unwrap();
    assert!(runner.error_report().is_none());
}

#[test]
fn test_dialog_heading_and_close() {
    let mut runner = runner("Saving");
    assert_eq!(runner.dialog().heading(), "Please wait");
    assert_eq!(runner.dialog().title(), "Saving");
    assert_eq!(runner.description(), "Saving");

    runner.close();
    assert_eq!(runner.dialog().percentage().listener_count(), 0);
}
