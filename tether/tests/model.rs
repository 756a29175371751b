//! Tests for the model change protocol.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

mod common;

use tether::bean::Disposable;
use tether::model::{
    BooleanModel, FIELD_MUST_BE_FILLED_IN, INVALID_EMAIL, IntegerModel, Model, PATTERN_MISMATCH,
    StringModel,
};

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn spy<T: 'static>(model: &Model<T>, count: &Arc<AtomicUsize>) -> tether::model::ListenerId {
    let count = Arc::clone(count);
    model.add_listener(move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    })
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

#[test]
fn test_equal_write_does_not_notify() {
    let model = StringModel::new(text("a"));
    let calls = counter();
    spy(&model, &calls);

    assert!(!model.set(text("a")));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_origin_is_not_notified() {
    let model = StringModel::default();
    let first = counter();
    let second = counter();
    let origin = spy(&model, &first);
    spy(&model, &second);

    assert!(model.set_from(text("x"), origin));
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn test_absent_values() {
    let model = StringModel::default();
    let calls = counter();
    spy(&model, &calls);

    model.set(None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    model.set(text("x"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    model.set(None);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_enabled_flag_follows_compare_assign_notify() {
    let model = BooleanModel::default();
    let calls = counter();
    spy(&model, &calls);

    assert!(!model.set_enabled(true, None));
    assert!(model.set_enabled(false, None));
    assert!(!model.is_enabled());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reentrant_write_is_queued() {
    let model = IntegerModel::new(Some(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    // Bumps 1 to 2 from inside the first pass.
    model.add_listener(|model| {
        if model.get() == Some(1) {
            model.set(Some(2));
        }
    });
    let log = Arc::clone(&seen);
    model.add_listener(move |model| log.lock().unwrap().push(model.get()));

    model.set(Some(1));

    // The second listener runs after the write in the first pass, so it
    // sees 2 twice: once in the first pass, once in the queued one.
    assert_eq!(*seen.lock().unwrap(), vec![Some(2), Some(2)]);
    assert_eq!(model.get(), Some(2));
}

#[test]
fn test_reentrant_passes_keep_their_origin() {
    let model = IntegerModel::default();
    let writer_calls = counter();
    let other_calls = counter();

    let writer_count = Arc::clone(&writer_calls);
    let writer = Arc::new(Mutex::new(None));
    let writer_id = Arc::clone(&writer);
    let id = model.add_listener(move |model| {
        writer_count.fetch_add(1, Ordering::SeqCst);
        if model.get() == Some(1)
            && let Some(id) = *writer_id.lock().unwrap()
        {
            model.set_from(Some(10), id);
        }
    });
    *writer.lock().unwrap() = Some(id);
    spy(&model, &other_calls);

    model.set(Some(1));

    assert_eq!(writer_calls.load(Ordering::SeqCst), 1);
    assert_eq!(other_calls.load(Ordering::SeqCst), 2);
    assert_eq!(model.get(), Some(10));
}

#[test]
fn test_panicking_listener_does_not_stop_the_pass() {
    common::init_logging();
    let model = IntegerModel::default();
    let calls = counter();
    model.add_listener(|_| panic!("listener failure"));
    spy(&model, &calls);

    model.set(Some(3));
    model.set(Some(4));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_listener_removed_during_pass_is_skipped() {
    let model = IntegerModel::default();
    let victim_calls = counter();
    let victim = Arc::new(Mutex::new(None));

    let target = Arc::clone(&victim);
    model.add_listener(move |model| {
        if let Some(id) = *target.lock().unwrap() {
            model.remove_listener(id);
        }
    });
    let id = spy(&model, &victim_calls);
    *victim.lock().unwrap() = Some(id);

    model.set(Some(1));

    assert_eq!(victim_calls.load(Ordering::SeqCst), 0);
    assert!(!model.has_listener(id));
}

#[test]
fn test_listener_added_during_pass_waits_for_next_pass() {
    let model = IntegerModel::default();
    let late_calls = counter();
    let added = Arc::new(AtomicUsize::new(0));

    let late = Arc::clone(&late_calls);
    let flag = Arc::clone(&added);
    model.add_listener(move |model| {
        if flag.fetch_add(1, Ordering::SeqCst) == 0 {
            let late = Arc::clone(&late);
            model.add_listener(move |_| {
                late.fetch_add(1, Ordering::SeqCst);
            });
        }
    });

    model.set(Some(1));
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);
    model.set(Some(2));
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_validate_notifies_only_when_errors_change() {
    let model = StringModel::default().must_be_filled(true);
    let calls = counter();
    spy(&model, &calls);

    assert!(!model.validate());
    assert_eq!(model.error_ids(), vec![FIELD_MUST_BE_FILLED_IN.to_string()]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(!model.validate());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    model.set(text("filled"));
    assert!(model.validate());
    assert!(!model.has_errors());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_must_be_filled_can_be_lifted() {
    let model = StringModel::new(text("")).must_be_filled(true);
    assert!(!model.validate());

    let model = model.must_be_filled(false);
    assert!(model.validate());
}

#[test]
fn test_error_ids_are_deduplicated() {
    let model = StringModel::default();
    model.set_error_ids(vec!["a".into(), "b".into(), "a".into()], None);
    assert_eq!(model.error_ids(), vec!["a".to_string(), "b".to_string()]);
    assert!(!model.add_error_id("b"));
    assert!(model.clear_error_ids());
}

#[test]
fn test_pattern_and_email_constraints() {
    let code = StringModel::new(text("AB-12"))
        .matches_pattern("[A-Z]{2}-[0-9]+", PATTERN_MISMATCH)
        .unwrap();
    assert!(code.validate());
    code.set(text("AB-12x"));
    assert!(!code.validate());
    assert_eq!(code.error_ids(), vec![PATTERN_MISMATCH.to_string()]);

    let email = StringModel::default().email(INVALID_EMAIL);
    assert!(email.validate());
    email.set(text("not an address"));
    assert!(!email.validate());
    email.set(text("ada@example.com"));
    assert!(email.validate());
}

#[test]
fn test_invalid_pattern_is_rejected() {
    assert!(
        StringModel::default()
            .matches_pattern("(unclosed", PATTERN_MISMATCH)
            .is_err()
    );
}

#[test]
fn test_subscription_close_removes_listener() {
    let model = IntegerModel::default();
    let calls = counter();
    let count = Arc::clone(&calls);
    let mut subscription = model.subscribe(move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(model.listener_count(), 1);

    subscription.close();
    subscription.close();
    model.set(Some(1));

    assert_eq!(model.listener_count(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(subscription.id(), None);
}

#[test]
fn test_with_updater_pushes_values() {
    let target = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&target);
    let model = Model::with_updater(0u8, move |value| *sink.lock().unwrap() = Some(value));

    model.set(5);
    assert_eq!(*target.lock().unwrap(), Some(5));
}

/// Equality that panics on a marker value, to poison the model's lock.
#[derive(Debug, Clone, Default)]
struct Touchy(i32);

impl PartialEq for Touchy {
    fn eq(&self, other: &Self) -> bool {
        assert!(other.0 >= 0, "negative values cannot be compared");
        self.0 == other.0
    }
}

#[test]
fn test_reads_agree_with_writes_after_poisoning() {
    common::init_logging();
    let model = Model::new(Touchy(1));
    model.add_error_id("custom.error");

    let result = panic::catch_unwind(AssertUnwindSafe(|| model.set(Touchy(-1))));
    assert!(result.is_err());

    assert!(model.set_enabled(false, None));
    assert!(!model.is_enabled());
    assert_eq!(model.error_ids(), vec!["custom.error".to_string()]);
    assert!(model.has_errors());
    assert!(model.set(Touchy(2)));
    assert_eq!(model.get(), Touchy(2));
}
