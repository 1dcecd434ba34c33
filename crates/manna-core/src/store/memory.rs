//! In-memory content store
//!
//! Backs tests and the demo mode of the web app. Assigns ids and strictly
//! increasing creation timestamps at insert, and serves newest-first
//! windows like the remote store does. Planned failures can be queued to
//! exercise the error paths of the feed.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Devotion, DevotionId, DevotionPatch, NewDevotion};

use super::{ContentStore, Identity};

struct MemoryState {
    rows: Vec<Devotion>,
    next_created_at: i64,
    planned_failures: VecDeque<Error>,
    fetch_log: Vec<(usize, usize)>,
    identity: Option<Identity>,
}

/// In-memory [`ContentStore`] implementation
pub struct MemoryContentStore {
    state: Mutex<MemoryState>,
}

impl MemoryContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                rows: Vec::new(),
                next_created_at: chrono::Utc::now().timestamp_millis(),
                planned_failures: VecDeque::new(),
                fetch_log: Vec::new(),
                identity: None,
            }),
        }
    }

    /// Seed records synchronously, assigning ids and timestamps in order.
    ///
    /// Demo and test convenience; the async trait path goes through
    /// [`ContentStore::insert`].
    pub fn preload<I>(&self, records: I)
    where
        I: IntoIterator<Item = NewDevotion>,
    {
        let mut state = self.lock();
        for new in records {
            let created_at = state.next_created_at;
            state.next_created_at += 1;
            let devotion = Devotion {
                id: DevotionId::new(),
                title: new.title,
                verse: new.verse,
                content: new.content,
                published_on: new.published_on,
                created_at,
            };
            state.rows.push(devotion);
        }
    }

    /// Queue an error to be returned by the next store operation
    pub fn fail_next(&self, error: Error) {
        self.lock().planned_failures.push_back(error);
    }

    /// The `(offset, limit)` windows requested so far, in call order
    #[must_use]
    pub fn fetch_log(&self) -> Vec<(usize, usize)> {
        self.lock().fetch_log.clone()
    }

    /// Number of page fetches issued against this store
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.lock().fetch_log.len()
    }

    /// Mark an operator as signed in
    pub fn sign_in_as(&self, identity: Identity) {
        self.lock().identity = Some(identity);
    }

    /// Clear the signed-in operator
    pub fn sign_out(&self) {
        self.lock().identity = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryState {
    fn take_planned_failure(&mut self) -> Result<()> {
        match self.planned_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Rows ordered newest first (creation timestamp descending)
    fn ordered(&self) -> Vec<Devotion> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Devotion>> {
        let mut state = self.lock();
        state.fetch_log.push((offset, limit));
        state.take_planned_failure()?;
        Ok(state
            .ordered()
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn insert(&self, new: NewDevotion) -> Result<Devotion> {
        new.validate()?;
        let mut state = self.lock();
        state.take_planned_failure()?;

        let created_at = state.next_created_at;
        state.next_created_at += 1;
        let devotion = Devotion {
            id: DevotionId::new(),
            title: new.title,
            verse: new.verse,
            content: new.content,
            published_on: new.published_on,
            created_at,
        };
        state.rows.push(devotion.clone());
        Ok(devotion)
    }

    async fn update_by_id(&self, id: DevotionId, patch: DevotionPatch) -> Result<Devotion> {
        let mut state = self.lock();
        state.take_planned_failure()?;

        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        row.apply_patch(&patch);
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: DevotionId) -> Result<()> {
        let mut state = self.lock();
        state.take_planned_failure()?;

        let before = state.rows.len();
        state.rows.retain(|row| row.id != id);
        if state.rows.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verse;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn new_devotion(title: &str) -> NewDevotion {
        NewDevotion {
            title: title.to_string(),
            verse: Verse::from_parts("John 15:5", "Apart from me you can do nothing."),
            content: format!("<p>{title}</p>"),
            published_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_timestamps() {
        let store = MemoryContentStore::new();
        let first = store.insert(new_devotion("First")).await.unwrap();
        let second = store.insert(new_devotion("Second")).await.unwrap();
        assert!(second.created_at > first.created_at);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_fetch_page_is_newest_first() {
        let store = MemoryContentStore::new();
        for index in 1..=5 {
            store
                .insert(new_devotion(&format!("Devotion {index}")))
                .await
                .unwrap();
        }

        let page = store.fetch_page(0, 3).await.unwrap();
        let titles: Vec<&str> = page.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["Devotion 5", "Devotion 4", "Devotion 3"]);

        let rest = store.fetch_page(3, 3).await.unwrap();
        let titles: Vec<&str> = rest.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["Devotion 2", "Devotion 1"]);
    }

    #[tokio::test]
    async fn test_update_replaces_mutable_fields() {
        let store = MemoryContentStore::new();
        let created = store.insert(new_devotion("Original")).await.unwrap();

        let mut patch = created.to_patch();
        patch.title = "Amended".to_string();
        let updated = store.update_by_id(created.id, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "Amended");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemoryContentStore::new();
        let created = store.insert(new_devotion("Only")).await.unwrap();
        let result = store
            .update_by_id(DevotionId::new(), created.to_patch())
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = MemoryContentStore::new();
        let keep = store.insert(new_devotion("Keep")).await.unwrap();
        let drop = store.insert(new_devotion("Drop")).await.unwrap();

        store.delete_by_id(drop.id).await.unwrap();
        let page = store.fetch_page(0, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, keep.id);

        assert!(matches!(
            store.delete_by_id(drop.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_planned_failure_is_consumed_once() {
        let store = MemoryContentStore::new();
        store.fail_next(Error::Connectivity("offline".into()));

        assert!(store.fetch_page(0, 5).await.is_err());
        assert!(store.fetch_page(0, 5).await.is_ok());
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_insert_validates_before_failure_queue() {
        let store = MemoryContentStore::new();
        let mut blank = new_devotion("x");
        blank.title = "  ".to_string();
        assert!(matches!(
            store.insert(blank).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_identity_round_trip() {
        let store = MemoryContentStore::new();
        assert!(store.current_identity().is_none());

        store.sign_in_as(Identity {
            id: "operator-1".to_string(),
            email: Some("admin@example.com".to_string()),
        });
        assert_eq!(
            store.current_identity().unwrap().id,
            "operator-1".to_string()
        );

        store.sign_out();
        assert!(store.current_identity().is_none());
    }
}
