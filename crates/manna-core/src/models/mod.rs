//! Data models for Manna

mod devotion;

pub use devotion::{Devotion, DevotionId, DevotionPatch, NewDevotion, Verse};
