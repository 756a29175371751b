//! Percentage bar.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use super::WidgetId;

/// A bar showing 0 to 100 percent.
#[derive(Debug)]
pub struct ProgressBar {
    id: WidgetId,
    value: Arc<AtomicU8>,
    dirty: Arc<AtomicBool>,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self {
            id: WidgetId::new(),
            value: Arc::new(AtomicU8::new(0)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Completed percentage
    pub fn value(&self) -> u8 {
        self.value.load(Ordering::SeqCst)
    }

    /// Set the percentage, clamped to 100
    pub fn set_value(&self, percent: u8) {
        let percent = percent.min(100);
        if self.value.swap(percent, Ordering::SeqCst) != percent {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Completed fraction (0.0 to 1.0)
    pub fn fraction(&self) -> f32 {
        f32::from(self.value()) / 100.0
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for ProgressBar {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}
