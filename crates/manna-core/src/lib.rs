//! manna-core - Core library for Manna
//!
//! This crate contains the shared models, the content-store interface, and
//! the feed/selection state containers used by all Manna surfaces (web,
//! CLI). It has no UI dependencies: the containers expose mutation methods
//! plus a read/subscribe interface, and presentation layers observe them.

pub mod error;
pub mod feed;
pub mod models;
pub mod selection;
pub mod store;

pub use error::{Error, Result};
pub use models::{Devotion, DevotionId};
