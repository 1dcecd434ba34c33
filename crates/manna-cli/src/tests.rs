use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use manna_core::models::{NewDevotion, Verse};
use manna_core::store::{ContentStore, MemoryContentStore};

use crate::commands::common::{
    devotion_to_list_item, format_devotion_lines, normalize_devotion_identifier,
    parse_publication_date, resolve_content, resolve_devotion,
};
use crate::error::CliError;

fn new_devotion(index: usize) -> NewDevotion {
    NewDevotion {
        title: format!("Devotion {index}"),
        verse: Verse::from_parts("Psalm 90:12", "Teach us to number our days."),
        content: format!("<p>Reading {index}</p>"),
        published_on: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
    }
}

fn seeded_store(count: usize) -> Arc<dyn ContentStore> {
    let store = MemoryContentStore::new();
    store.preload((1..=count).map(new_devotion));
    Arc::new(store)
}

#[test]
fn normalize_devotion_identifier_trims_and_lowercases() {
    assert_eq!(
        normalize_devotion_identifier("  0191C2F6  ").unwrap(),
        "0191c2f6".to_string()
    );
    assert!(matches!(
        normalize_devotion_identifier(" \t "),
        Err(CliError::EmptyDevotionId)
    ));
}

#[test]
fn parse_publication_date_accepts_iso_dates() {
    assert_eq!(
        parse_publication_date(Some("2024-03-05")).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    );
    assert!(matches!(
        parse_publication_date(Some("03/05/2024")),
        Err(CliError::InvalidDate(_))
    ));
}

#[test]
fn parse_publication_date_defaults_to_today() {
    let parsed = parse_publication_date(None).unwrap();
    assert_eq!(parsed, chrono::Utc::now().date_naive());
}

#[test]
fn resolve_content_trims_and_rejects_empty() {
    assert_eq!(
        resolve_content(Some("  <p>hello</p>  ")).unwrap(),
        "<p>hello</p>".to_string()
    );
    assert!(matches!(
        resolve_content(Some(" \n ")),
        Err(CliError::EmptyContent)
    ));
}

#[test]
fn format_devotion_lines_shows_short_id_and_reference() {
    let store = MemoryContentStore::new();
    store.preload([new_devotion(1)]);
    let devotions = block_on_first_page(&store);

    let lines = format_devotion_lines(&devotions);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.starts_with(&devotions[0].id.to_string()[..8]));
    assert!(line.contains("Devotion 1"));
    assert!(line.contains("[Psalm 90:12]"));
    assert!(line.contains("2024-07-01"));
}

#[test]
fn devotion_to_list_item_projects_fields() {
    let store = MemoryContentStore::new();
    store.preload([new_devotion(7)]);
    let devotion = block_on_first_page(&store).remove(0);

    let item = devotion_to_list_item(&devotion);
    assert_eq!(item.id, devotion.id.to_string());
    assert_eq!(item.title, "Devotion 7");
    assert_eq!(item.reference, "Psalm 90:12");
    assert_eq!(item.published_on, "2024-07-01");
    assert_eq!(item.created_at, devotion.created_at);

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["reference"], "Psalm 90:12");
}

#[tokio::test]
async fn resolve_devotion_finds_full_id_beyond_first_page() {
    let store = seeded_store(120);
    // Oldest record lands on the second scan window.
    let deep = store.fetch_page(119, 1).await.unwrap().remove(0);

    let resolved = resolve_devotion(&store, &deep.id.to_string()).await.unwrap();
    assert_eq!(resolved.id, deep.id);
    assert_eq!(resolved.title, "Devotion 1");
}

#[tokio::test]
async fn resolve_devotion_accepts_unique_prefix() {
    let store = seeded_store(3);
    let target = store.fetch_page(1, 1).await.unwrap().remove(0);
    let id = target.id.to_string();
    let prefix = &id[..id.len() - 4];

    let resolved = resolve_devotion(&store, prefix).await.unwrap();
    assert_eq!(resolved.id, target.id);
}

#[tokio::test]
async fn resolve_devotion_rejects_ambiguous_prefix() {
    let store = seeded_store(5);
    // UUIDv7 ids generated in one run share their leading timestamp bits.
    let sample = store.fetch_page(0, 1).await.unwrap().remove(0);
    let prefix = &sample.id.to_string()[..8];

    let result = resolve_devotion(&store, prefix).await;
    assert!(matches!(result, Err(CliError::AmbiguousDevotionId(_))));
}

#[tokio::test]
async fn resolve_devotion_reports_unknown_ids() {
    let store = seeded_store(3);
    let result = resolve_devotion(&store, "ffffffff").await;
    assert!(matches!(result, Err(CliError::DevotionNotFound(_))));
}

/// Synchronous convenience for the non-async tests above.
fn block_on_first_page(store: &MemoryContentStore) -> Vec<manna_core::Devotion> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(store.fetch_page(0, 10))
        .unwrap()
}
