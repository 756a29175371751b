//! Listener identity and the iteration-safe listener registry.
//!
//! Models and host widgets both keep their subscribers in a [`Listeners`]
//! registry. Every registration gets a [`ListenerId`]; the id is what a
//! mutator receives as its change origin, so suppression compares handles,
//! never callback values.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::extract_panic_message;

/// Handle of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
    fn next() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__listener_{}", self.0)
    }
}

/// Registry of callbacks of type `A` (usually a `dyn Fn(..)`).
///
/// Dispatch works on a snapshot taken before the first callback runs, so
/// callbacks may add or remove listeners freely. A listener removed while a
/// pass is running is skipped for the remainder of that pass.
pub(crate) struct Listeners<A: ?Sized> {
    entries: RwLock<Vec<(ListenerId, Arc<A>)>>,
}

impl<A: ?Sized> Listeners<A> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback and return its handle.
    pub(crate) fn add(&self, listener: Arc<A>) -> ListenerId {
        let id = ListenerId::next();
        match self.entries.write() {
            Ok(mut guard) => guard.push((id, listener)),
            Err(poisoned) => poisoned.into_inner().push((id, listener)),
        }
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut guard = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = guard.len();
        guard.retain(|(entry, _)| *entry != id);
        guard.len() != before
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.entries
            .read()
            .map(|guard| guard.iter().any(|(entry, _)| *entry == id))
            .unwrap_or(false)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    fn snapshot(&self) -> Vec<(ListenerId, Arc<A>)> {
        self.entries
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Run `call` for every listener except `origin`.
    ///
    /// A panicking listener is logged and the pass continues with the next
    /// one. Returns the number of listeners that were invoked.
    pub(crate) fn dispatch(&self, origin: Option<ListenerId>, mut call: impl FnMut(&A)) -> usize {
        let mut invoked = 0;
        for (id, listener) in self.snapshot() {
            if Some(id) == origin || !self.contains(id) {
                continue;
            }
            invoked += 1;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(&*listener)));
            if let Err(payload) = outcome {
                log::error!(
                    "Listener {} panicked, continuing notification: {}",
                    id,
                    extract_panic_message(&payload)
                );
            }
        }
        invoked
    }
}

impl<A: ?Sized> fmt::Debug for Listeners<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    type Callback = dyn Fn(&Mutex<Vec<usize>>) + Send + Sync;

    #[test]
    fn test_dispatch_skips_origin() {
        let listeners: Listeners<Callback> = Listeners::new();
        let first = listeners.add(Arc::new(|log: &Mutex<Vec<usize>>| {
            log.lock().unwrap().push(1)
        }));
        listeners.add(Arc::new(|log: &Mutex<Vec<usize>>| log.lock().unwrap().push(2)));

        let log = Mutex::new(Vec::new());
        let invoked = listeners.dispatch(Some(first), |l| l(&log));

        assert_eq!(invoked, 1);
        assert_eq!(*log.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_dispatch_preserves_registration_order() {
        let listeners: Listeners<Callback> = Listeners::new();
        for n in 0..4 {
            listeners.add(Arc::new(move |log: &Mutex<Vec<usize>>| {
                log.lock().unwrap().push(n)
            }));
        }

        let log = Mutex::new(Vec::new());
        listeners.dispatch(None, |l| l(&log));

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_unknown_id() {
        let listeners: Listeners<Callback> = Listeners::new();
        let id = listeners.add(Arc::new(|_: &Mutex<Vec<usize>>| {}));
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_listener_id_display() {
        let id = ListenerId(7);
        assert_eq!(id.to_string(), "__listener_7");
    }
}
