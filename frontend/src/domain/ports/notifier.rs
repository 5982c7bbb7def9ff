//! Driven port displaying notifications.

use std::sync::{Mutex, PoisonError};

use crate::domain::Notice;

/// Port rendering one notification to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Display `notice`.
    fn show(&self, notice: &Notice);
}

/// Notifier that keeps every notice in memory.
#[derive(Debug, Default)]
pub struct FixtureNotifier {
    shown: Mutex<Vec<Notice>>,
}

impl FixtureNotifier {
    /// Notices shown so far, oldest first.
    pub fn shown(&self) -> Vec<Notice> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for FixtureNotifier {
    fn show(&self, notice: &Notice) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
