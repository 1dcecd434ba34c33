//! Devotion model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A unique identifier for a devotion, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevotionId(Uuid);

impl DevotionId {
    /// Create a new unique devotion ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for DevotionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DevotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DevotionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A memory verse in compound `"reference | full text"` form.
///
/// The reference is the substring before the first `|`. The raw compound
/// text round-trips unparsed through storage; only accessors split it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verse(String);

impl Verse {
    /// Wrap an already-compound verse string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build the compound form from a reference and the full text
    #[must_use]
    pub fn from_parts(reference: &str, text: &str) -> Self {
        Self(format!("{} | {}", reference.trim(), text.trim()))
    }

    /// The scripture reference: everything before the first `|`, trimmed.
    ///
    /// A verse without a `|` is all reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self.0.split_once('|') {
            Some((reference, _)) => reference.trim(),
            None => self.0.trim(),
        }
    }

    /// The full verse text: everything after the first `|`, trimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        self.0
            .split_once('|')
            .map_or("", |(_, text)| text.trim())
    }

    /// The raw compound form as stored
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the compound form is blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A devotion in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Devotion {
    /// Unique identifier, assigned by the store at insert
    pub id: DevotionId,
    /// Title shown in lists and in the reader
    pub title: String,
    /// Memory verse in compound `"reference | full text"` form
    pub verse: Verse,
    /// Rich text body (HTML), treated as opaque
    pub content: String,
    /// Publication date; editable after insert
    pub published_on: NaiveDate,
    /// Creation timestamp (Unix ms); assigned once at insert, never changes,
    /// and orders the reading feed (newest first)
    pub created_at: i64,
}

impl Devotion {
    /// Replace the mutable fields with the patch's fields.
    ///
    /// Id and creation timestamp are not patchable.
    pub fn apply_patch(&mut self, patch: &DevotionPatch) {
        self.title = patch.title.clone();
        self.verse = patch.verse.clone();
        self.content = patch.content.clone();
        self.published_on = patch.published_on;
    }

    /// Snapshot the mutable fields as a patch (base for an edit form)
    #[must_use]
    pub fn to_patch(&self) -> DevotionPatch {
        DevotionPatch {
            title: self.title.clone(),
            verse: self.verse.clone(),
            content: self.content.clone(),
            published_on: self.published_on,
        }
    }
}

/// Payload for inserting a devotion; id and creation timestamp are assigned
/// by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevotion {
    pub title: String,
    pub verse: Verse,
    pub content: String,
    pub published_on: NaiveDate,
}

impl NewDevotion {
    /// Reject records a store would refuse: blank title or verse.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Title is required".to_string()));
        }
        if self.verse.is_empty() {
            return Err(Error::Validation("Verse is required".to_string()));
        }
        Ok(())
    }
}

/// The mutable fields of a devotion, applied as a whole on update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevotionPatch {
    pub title: String,
    pub verse: Verse,
    pub content: String,
    pub published_on: NaiveDate,
}
