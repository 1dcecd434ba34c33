//! Devotion feed state container
//!
//! An ordered, id-keyed cache of loaded devotions combined with the
//! incremental fetch state machine that drives infinite scroll. The feed
//! owns a [`PageCursor`] and a single-flight guard: at most one page fetch
//! is in flight, later windows are never requested before the previous one
//! settles, and sentinel-visibility events arriving mid-fetch are ignored.
//!
//! The container is deliberately unaware of rendering. Mutations go through
//! explicit methods; readers take a [`FeedSnapshot`] and may subscribe to a
//! revision channel to learn when to take a fresh one.

mod cursor;

pub use cursor::{PageCursor, PageWindow};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::Result;
use crate::models::{Devotion, DevotionId, DevotionPatch, NewDevotion};
use crate::store::ContentStore;

/// Fetch phase of the infinite-scroll trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// Ready to fetch when the sentinel becomes visible
    Idle,
    /// A page fetch is in flight; sentinel events are ignored
    Fetching,
    /// A short page was received; terminal, no further fetches
    Exhausted,
}

/// Point-in-time view of the feed for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub devotions: Vec<Devotion>,
    pub phase: FeedPhase,
}

struct FeedState {
    cache: Vec<Devotion>,
    cursor: PageCursor,
    phase: FeedPhase,
    /// Bumped by full reloads and by [`DevotionFeed::detach`]; a settling
    /// fetch whose generation no longer matches is discarded instead of
    /// applied to a cache it no longer describes.
    generation: u64,
}

struct FeedInner {
    store: Arc<dyn ContentStore>,
    state: Mutex<FeedState>,
    revision: watch::Sender<u64>,
}

/// Cloneable handle to one feed instance.
///
/// Each view constructs its own feed; handles are never shared across the
/// public/admin boundary. Equality is handle identity, so the type can sit
/// in component props.
#[derive(Clone)]
pub struct DevotionFeed {
    inner: Arc<FeedInner>,
}

impl PartialEq for DevotionFeed {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DevotionFeed {}

impl DevotionFeed {
    /// Create an empty feed over the given store
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, page_size: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(FeedInner {
                store,
                state: Mutex::new(FeedState {
                    cache: Vec::new(),
                    cursor: PageCursor::new(page_size),
                    phase: FeedPhase::Idle,
                    generation: 0,
                }),
                revision,
            }),
        }
    }

    /// Load the first page, replacing whatever was loaded before.
    ///
    /// Clears the cache, resets the cursor, and fetches window zero. Also
    /// the reload path after a successful create. Any fetch still in flight
    /// when this is called settles into a stale generation and is
    /// discarded.
    pub async fn load_initial(&self) -> Result<()> {
        let (window, generation) = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.cache.clear();
            state.cursor.reset();
            state.phase = FeedPhase::Fetching;
            (state.cursor.next_window(), state.generation)
        };
        self.notify();

        let fetched = self
            .inner
            .store
            .fetch_page(window.offset, window.limit)
            .await;
        self.settle(generation, fetched, true)
    }

    /// The sentinel became visible: fetch the next window if the feed is
    /// idle and not exhausted.
    ///
    /// Ignored while a fetch is in flight or after exhaustion. On failure
    /// the cursor does not advance, so the same window is retried on the
    /// next visibility event.
    pub async fn load_next(&self) -> Result<()> {
        let (window, generation) = {
            let mut state = self.lock_state();
            match state.phase {
                FeedPhase::Fetching | FeedPhase::Exhausted => return Ok(()),
                FeedPhase::Idle => {}
            }
            state.phase = FeedPhase::Fetching;
            (state.cursor.next_window(), state.generation)
        };
        self.notify();

        let fetched = self
            .inner
            .store
            .fetch_page(window.offset, window.limit)
            .await;
        self.settle(generation, fetched, false)
    }

    /// Insert at the store, then reload the feed from the top.
    ///
    /// The full reload (rather than a local splice) restores the record's
    /// order-by-creation position. A failed insert never touches the cache.
    pub async fn apply_create(&self, new: NewDevotion) -> Result<Devotion> {
        let created = self.inner.store.insert(new).await?;
        tracing::debug!(id = %created.id, "devotion created; reloading feed");
        self.load_initial().await?;
        Ok(created)
    }

    /// Update at the store, then patch the loaded entry in place.
    ///
    /// A record on a page not yet loaded is left alone; order is preserved
    /// either way.
    pub async fn apply_update(&self, id: DevotionId, patch: DevotionPatch) -> Result<Devotion> {
        let updated = self.inner.store.update_by_id(id, patch.clone()).await?;
        {
            let mut state = self.lock_state();
            if let Some(entry) = state.cache.iter_mut().find(|entry| entry.id == id) {
                entry.apply_patch(&patch);
            }
        }
        self.notify();
        Ok(updated)
    }

    /// Delete at the store, then drop the loaded entry if present
    pub async fn apply_delete(&self, id: DevotionId) -> Result<()> {
        self.inner.store.delete_by_id(id).await?;
        {
            let mut state = self.lock_state();
            state.cache.retain(|entry| entry.id != id);
        }
        self.notify();
        Ok(())
    }

    /// Mark the consuming view as gone: any fetch that settles afterwards
    /// is discarded rather than applied to a stale cache.
    pub fn detach(&self) {
        self.lock_state().generation += 1;
    }

    /// Current cache contents and fetch phase
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.lock_state();
        FeedSnapshot {
            devotions: state.cache.clone(),
            phase: state.phase,
        }
    }

    /// Current fetch phase
    #[must_use]
    pub fn phase(&self) -> FeedPhase {
        self.lock_state().phase
    }

    /// Whether the store has no more pages to give
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.lock_state().phase == FeedPhase::Exhausted
    }

    /// Revision channel: the value changes whenever the cache or phase does
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    fn settle(
        &self,
        generation: u64,
        fetched: Result<Vec<Devotion>>,
        replace: bool,
    ) -> Result<()> {
        let mut state = self.lock_state();
        if state.generation != generation {
            tracing::debug!("discarding page fetch that settled after the feed moved on");
            return Ok(());
        }

        let outcome = match fetched {
            Ok(page) => {
                let received = page.len();
                if replace {
                    state.cache = page;
                } else {
                    state.cache.extend(page);
                }
                state.cursor.advance(received);
                state.phase = if state.cursor.is_exhausted() {
                    FeedPhase::Exhausted
                } else {
                    FeedPhase::Idle
                };
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "page fetch failed; feed returns to idle");
                state.phase = FeedPhase::Idle;
                Err(error)
            }
        };
        drop(state);
        self.notify();
        outcome
    }

    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.inner
            .revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Verse;
    use crate::store::MemoryContentStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn new_devotion(index: usize) -> NewDevotion {
        NewDevotion {
            title: format!("Devotion {index}"),
            verse: Verse::from_parts("John 6:35", "I am the bread of life."),
            content: format!("<p>Reading {index}</p>"),
            published_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    async fn seeded_store(count: usize) -> Arc<MemoryContentStore> {
        let store = Arc::new(MemoryContentStore::new());
        for index in 1..=count {
            store.insert(new_devotion(index)).await.unwrap();
        }
        store
    }

    fn titles(feed: &DevotionFeed) -> Vec<String> {
        feed.snapshot()
            .devotions
            .iter()
            .map(|devotion| devotion.title.clone())
            .collect()
    }

    fn expected_titles(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
        range.rev().map(|index| format!("Devotion {index}")).collect()
    }

    #[tokio::test]
    async fn test_initial_load_fills_first_window() {
        let store = seeded_store(20).await;
        let feed = DevotionFeed::new(store.clone(), 9);

        feed.load_initial().await.unwrap();
        assert_eq!(titles(&feed), expected_titles(12..=20));
        assert_eq!(feed.phase(), FeedPhase::Idle);
        assert_eq!(store.fetch_log(), vec![(0, 9)]);
    }

    #[tokio::test]
    async fn test_twenty_records_page_size_nine_scenario() {
        let store = seeded_store(20).await;
        let feed = DevotionFeed::new(store.clone(), 9);

        feed.load_initial().await.unwrap();
        assert_eq!(feed.snapshot().devotions.len(), 9);
        assert!(!feed.is_exhausted());

        feed.load_next().await.unwrap();
        assert_eq!(titles(&feed), expected_titles(3..=20));
        assert!(!feed.is_exhausted());

        feed.load_next().await.unwrap();
        assert_eq!(titles(&feed), expected_titles(1..=20));
        assert!(feed.is_exhausted());

        // Further sentinel visibility triggers no fetch.
        feed.load_next().await.unwrap();
        feed.load_next().await.unwrap();
        assert_eq!(store.fetch_log(), vec![(0, 9), (9, 9), (18, 9)]);
        assert!(feed.is_exhausted());
    }

    #[tokio::test]
    async fn test_cache_is_concatenation_of_pages_in_fetch_order() {
        let store = seeded_store(10).await;
        let feed = DevotionFeed::new(store, 4);

        feed.load_initial().await.unwrap();
        feed.load_next().await.unwrap();
        feed.load_next().await.unwrap();

        assert_eq!(titles(&feed), expected_titles(1..=10));
        assert_eq!(feed.snapshot().devotions.len(), 10);
        assert!(feed.is_exhausted());
    }

    #[tokio::test]
    async fn test_failed_page_fetch_leaves_cache_and_cursor_untouched() {
        let store = seeded_store(20).await;
        let feed = DevotionFeed::new(store.clone(), 9);
        feed.load_initial().await.unwrap();

        store.fail_next(Error::Connectivity("offline".into()));
        let error = feed.load_next().await.unwrap_err();
        assert!(error.is_retryable());
        assert_eq!(feed.snapshot().devotions.len(), 9);
        assert_eq!(feed.phase(), FeedPhase::Idle);

        // The same window is retried on the next visibility event.
        feed.load_next().await.unwrap();
        assert_eq!(store.fetch_log(), vec![(0, 9), (9, 9), (9, 9)]);
        assert_eq!(titles(&feed), expected_titles(3..=20));
    }

    #[tokio::test]
    async fn test_apply_update_patches_entry_in_place() {
        let store = seeded_store(5).await;
        let feed = DevotionFeed::new(store, 9);
        feed.load_initial().await.unwrap();

        let target = feed.snapshot().devotions[2].clone();
        let mut patch = target.to_patch();
        patch.title = "Renewed".to_string();
        patch.published_on = NaiveDate::from_ymd_opt(2024, 9, 9).unwrap();
        feed.apply_update(target.id, patch.clone()).await.unwrap();

        let snapshot = feed.snapshot();
        let entry = &snapshot.devotions[2];
        assert_eq!(entry.id, target.id);
        assert_eq!(entry.created_at, target.created_at);
        assert_eq!(entry.title, patch.title);
        assert_eq!(entry.published_on, patch.published_on);
        assert_eq!(snapshot.devotions.len(), 5);
    }

    #[tokio::test]
    async fn test_apply_update_for_unloaded_record_is_a_cache_noop() {
        let store = seeded_store(20).await;
        let feed = DevotionFeed::new(store.clone(), 9);
        feed.load_initial().await.unwrap();

        // A record beyond the loaded window.
        let deep = store.fetch_page(15, 1).await.unwrap().remove(0);
        let mut patch = deep.to_patch();
        patch.title = "Hidden".to_string();
        feed.apply_update(deep.id, patch).await.unwrap();

        assert_eq!(titles(&feed), expected_titles(12..=20));
    }

    #[tokio::test]
    async fn test_apply_delete_removes_exactly_one_preserving_order() {
        let store = seeded_store(6).await;
        let feed = DevotionFeed::new(store, 9);
        feed.load_initial().await.unwrap();

        let victim = feed.snapshot().devotions[3].clone();
        feed.apply_delete(victim.id).await.unwrap();

        let remaining = titles(&feed);
        assert_eq!(remaining.len(), 5);
        assert!(!remaining.contains(&victim.title));
        let mut expected = expected_titles(1..=6);
        expected.retain(|title| *title != victim.title);
        assert_eq!(remaining, expected);
    }

    #[tokio::test]
    async fn test_failed_mutations_never_touch_the_cache() {
        let store = seeded_store(5).await;
        let feed = DevotionFeed::new(store.clone(), 9);
        feed.load_initial().await.unwrap();
        let before = feed.snapshot();

        store.fail_next(Error::Validation("title required".into()));
        assert!(feed.apply_create(new_devotion(99)).await.is_err());
        assert_eq!(feed.snapshot(), before);

        let target = before.devotions[0].clone();
        store.fail_next(Error::Connectivity("offline".into()));
        assert!(feed
            .apply_update(target.id, target.to_patch())
            .await
            .is_err());
        assert_eq!(feed.snapshot(), before);

        store.fail_next(Error::NotFound(target.id.to_string()));
        assert!(feed.apply_delete(target.id).await.is_err());
        assert_eq!(feed.snapshot(), before);
    }

    #[tokio::test]
    async fn test_apply_create_reloads_with_new_record_first() {
        let store = seeded_store(12).await;
        let feed = DevotionFeed::new(store, 9);
        feed.load_initial().await.unwrap();
        feed.load_next().await.unwrap();
        assert_eq!(feed.snapshot().devotions.len(), 12);

        let created = feed.apply_create(new_devotion(13)).await.unwrap();

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.devotions.len(), 9);
        assert_eq!(snapshot.devotions[0].id, created.id);
        assert_eq!(snapshot.devotions[0].title, "Devotion 13");
        assert_eq!(feed.phase(), FeedPhase::Idle);
    }

    #[tokio::test]
    async fn test_revision_changes_on_every_cache_mutation() {
        let store = seeded_store(3).await;
        let feed = DevotionFeed::new(store, 9);
        let mut revision = feed.subscribe();
        assert!(!revision.has_changed().unwrap());

        feed.load_initial().await.unwrap();
        assert!(revision.has_changed().unwrap());
        revision.mark_unchanged();

        let victim = feed.snapshot().devotions[0].clone();
        feed.apply_delete(victim.id).await.unwrap();
        assert!(revision.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_deleting_the_open_devotion_clears_the_selection() {
        let store = seeded_store(3).await;
        let feed = DevotionFeed::new(store, 9);
        feed.load_initial().await.unwrap();

        let selection = crate::selection::Selection::new();
        let open = feed.snapshot().devotions[1].clone();
        selection.open(open.clone());

        feed.apply_delete(open.id).await.unwrap();
        assert!(selection.drop_if(open.id));
        assert!(!selection.is_open());
        assert!(!feed
            .snapshot()
            .devotions
            .iter()
            .any(|devotion| devotion.id == open.id));
    }

    /// Store whose page fetches block until the test releases the gate.
    struct GatedStore {
        inner: Arc<MemoryContentStore>,
        gate: Semaphore,
        started: AtomicUsize,
    }

    impl GatedStore {
        fn new(inner: Arc<MemoryContentStore>) -> Self {
            Self {
                inner,
                gate: Semaphore::new(0),
                started: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentStore for GatedStore {
        async fn fetch_page(&self, offset: usize, limit: usize) -> crate::Result<Vec<Devotion>> {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.gate
                .acquire()
                .await
                .expect("gate closed")
                .forget();
            self.inner.fetch_page(offset, limit).await
        }

        async fn insert(&self, new: NewDevotion) -> crate::Result<Devotion> {
            self.inner.insert(new).await
        }

        async fn update_by_id(
            &self,
            id: DevotionId,
            patch: DevotionPatch,
        ) -> crate::Result<Devotion> {
            self.inner.update_by_id(id, patch).await
        }

        async fn delete_by_id(&self, id: DevotionId) -> crate::Result<()> {
            self.inner.delete_by_id(id).await
        }

        fn current_identity(&self) -> Option<crate::store::Identity> {
            self.inner.current_identity()
        }
    }

    async fn wait_for_started(store: &GatedStore, count: usize) {
        while store.started.load(Ordering::SeqCst) < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_sentinel_events_during_fetch_are_ignored() {
        let store = Arc::new(GatedStore::new(seeded_store(20).await));
        let feed = DevotionFeed::new(store.clone(), 9);

        store.gate.add_permits(1);
        feed.load_initial().await.unwrap();

        let pending = tokio::spawn({
            let feed = feed.clone();
            async move { feed.load_next().await }
        });
        wait_for_started(&store, 2).await;
        assert_eq!(feed.phase(), FeedPhase::Fetching);

        // Sentinel fires again mid-fetch: no second request is issued.
        feed.load_next().await.unwrap();
        assert_eq!(store.started.load(Ordering::SeqCst), 2);

        store.gate.add_permits(1);
        pending.await.unwrap().unwrap();
        assert_eq!(feed.snapshot().devotions.len(), 18);
    }

    #[tokio::test]
    async fn test_fetch_settling_after_detach_is_discarded() {
        let store = Arc::new(GatedStore::new(seeded_store(20).await));
        let feed = DevotionFeed::new(store.clone(), 9);

        store.gate.add_permits(1);
        feed.load_initial().await.unwrap();

        let pending = tokio::spawn({
            let feed = feed.clone();
            async move { feed.load_next().await }
        });
        wait_for_started(&store, 2).await;

        // The consuming view unmounts while the fetch is in flight.
        feed.detach();
        store.gate.add_permits(1);
        pending.await.unwrap().unwrap();

        assert_eq!(feed.snapshot().devotions.len(), 9);
    }
}
