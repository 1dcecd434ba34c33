//! Application state management
//!
//! Global state accessible via Dioxus context providers. The heavy state
//! lives in manna-core containers; the signals here hold handles, the
//! active screen, and the small bits of UI-only state.

use std::fmt;

use dioxus::prelude::*;

use manna_core::selection::Selection;
use manna_core::store::Identity;
use manna_core::Devotion;

use crate::services::Backend;

/// Devotions per fetched page
pub const FEED_PAGE_SIZE: usize = 9;

/// Which top-level screen is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Reading,
    Login,
    Admin,
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Backend built once at startup and passed down explicitly
    pub backend: Signal<Backend>,
    /// Active screen
    pub screen: Signal<Screen>,
    /// Signed-in operator, if any
    pub identity: Signal<Option<Identity>>,
    /// Reader selection shared by every screen
    pub selection: Signal<Selection>,
    /// Bumped by the selection watcher so readers re-render
    pub selection_revision: Signal<u64>,
    /// Last store failure surfaced to the user
    pub status_line: Signal<Option<String>>,
}

impl AppState {
    /// Surface a store failure at the point of action
    pub fn report_error(&mut self, error: &dyn fmt::Display) {
        let message = error.to_string();
        tracing::warn!("Surfacing error to user: {message}");
        self.status_line.set(Some(message));
    }

    pub fn clear_status(&mut self) {
        self.status_line.set(None);
    }

    /// Open the reader modal for a devotion
    pub fn open_reader(&self, devotion: Devotion) {
        (self.selection)().open(devotion);
    }
}
