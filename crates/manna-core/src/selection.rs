//! Reader selection state
//!
//! Single-selection model for the devotion reader: at most one devotion is
//! open at a time, and while one is open the page scroll is locked. Like
//! the feed, this is an explicit state container with a revision channel
//! for observers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::models::{Devotion, DevotionId};

struct SelectionInner {
    current: Mutex<Option<Devotion>>,
    revision: watch::Sender<u64>,
}

/// Cloneable handle to the reader selection
#[derive(Clone)]
pub struct Selection {
    inner: Arc<SelectionInner>,
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Selection {}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(SelectionInner {
                current: Mutex::new(None),
                revision,
            }),
        }
    }

    /// Open a devotion for reading, replacing any current selection
    pub fn open(&self, devotion: Devotion) {
        *self.lock_current() = Some(devotion);
        self.notify();
    }

    /// Close the reader and release the scroll lock
    pub fn close(&self) {
        let closed = self.lock_current().take().is_some();
        if closed {
            self.notify();
        }
    }

    /// Clear the selection if the given devotion is the one open.
    ///
    /// Called after a delete so the reader never points at a removed
    /// record. Returns whether anything was cleared.
    pub fn drop_if(&self, id: DevotionId) -> bool {
        let mut current = self.lock_current();
        if current.as_ref().is_some_and(|open| open.id == id) {
            *current = None;
            drop(current);
            self.notify();
            return true;
        }
        false
    }

    /// The devotion currently open, if any
    #[must_use]
    pub fn current(&self) -> Option<Devotion> {
        self.lock_current().clone()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock_current().is_some()
    }

    /// Whether the page scroll lock should be engaged
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// Revision channel: the value changes whenever the selection does
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Devotion>> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.inner
            .revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}
