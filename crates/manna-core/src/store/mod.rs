//! Content store layer for Manna
//!
//! All persistence and querying is delegated to an external store behind
//! the [`ContentStore`] trait. Surfaces construct a concrete store at
//! startup and pass it in explicitly; nothing in this crate holds a global
//! store handle.

mod memory;
mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Devotion, DevotionId, DevotionPatch, NewDevotion};

pub use memory::MemoryContentStore;
pub use supabase::{normalize_rest_url, SupabaseContentStore};

/// The signed-in operator, as reported by the identity collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

/// Query interface over devotion records.
///
/// Pages are ordered by creation timestamp descending (newest first).
/// Mutations return only after the store has confirmed them; callers apply
/// local cache changes strictly post-success.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the window `[offset, offset + limit)` of the ordered record set
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Devotion>>;

    /// Insert a record; the store assigns id and creation timestamp
    async fn insert(&self, new: NewDevotion) -> Result<Devotion>;

    /// Replace the mutable fields of the record with the given id
    async fn update_by_id(&self, id: DevotionId, patch: DevotionPatch) -> Result<Devotion>;

    /// Delete the record with the given id
    async fn delete_by_id(&self, id: DevotionId) -> Result<()>;

    /// Who is signed in, if anyone
    fn current_identity(&self) -> Option<Identity>;
}
