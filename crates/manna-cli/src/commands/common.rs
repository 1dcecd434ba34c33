//! Shared helpers for CLI commands

use std::env;
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use manna_core::store::{ContentStore, SupabaseContentStore};
use manna_core::{Devotion, DevotionId};

use crate::error::CliError;

/// Window size used when scanning the store for an ID prefix
const RESOLVE_PAGE_SIZE: usize = 100;

/// JSON projection of a devotion for list output
#[derive(Debug, Serialize)]
pub struct DevotionListItem {
    pub id: String,
    pub title: String,
    pub reference: String,
    pub verse: String,
    pub published_on: String,
    pub created_at: i64,
}

pub fn devotion_to_list_item(devotion: &Devotion) -> DevotionListItem {
    DevotionListItem {
        id: devotion.id.to_string(),
        title: devotion.title.clone(),
        reference: devotion.verse.reference().to_string(),
        verse: devotion.verse.as_str().to_string(),
        published_on: devotion.published_on.format("%Y-%m-%d").to_string(),
        created_at: devotion.created_at,
    }
}

/// One line per devotion: short id, date, title, verse reference
pub fn format_devotion_lines(devotions: &[Devotion]) -> Vec<String> {
    devotions
        .iter()
        .map(|devotion| {
            let id = devotion.id.to_string();
            format!(
                "{}  {}  {}  [{}]",
                &id[..8],
                devotion.published_on.format("%Y-%m-%d"),
                devotion.title,
                devotion.verse.reference()
            )
        })
        .collect()
}

/// Build the content store from `MANNA_SUPABASE_URL` and
/// `MANNA_SUPABASE_ANON_KEY`.
///
/// `MANNA_SUPABASE_ACCESS_TOKEN`, when set, is attached as the bearer token
/// so row-level security sees the operator instead of the anon role.
pub fn resolve_store() -> Result<Arc<dyn ContentStore>, CliError> {
    let url = require_env("MANNA_SUPABASE_URL")?;
    let anon_key = require_env("MANNA_SUPABASE_ANON_KEY")?;

    let store = SupabaseContentStore::new(&url, &anon_key)?;
    tracing::debug!("Using Supabase content store at {url}");
    if let Ok(token) = env::var("MANNA_SUPABASE_ACCESS_TOKEN") {
        if !token.trim().is_empty() {
            store.attach_access_token(token.trim().to_string());
        }
    }
    Ok(Arc::new(store))
}

fn require_env(name: &str) -> Result<String, CliError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(CliError::Config(format!("{name} is not set"))),
    }
}

/// Normalize a devotion identifier argument
pub fn normalize_devotion_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyDevotionId);
    }
    Ok(trimmed.to_lowercase())
}

/// Resolve a full ID or unique ID prefix by scanning the store newest-first
pub async fn resolve_devotion(
    store: &Arc<dyn ContentStore>,
    id_or_prefix: &str,
) -> Result<Devotion, CliError> {
    let needle = normalize_devotion_identifier(id_or_prefix)?;
    let full_id = needle.parse::<DevotionId>().ok();

    let mut offset = 0;
    let mut matches: Vec<Devotion> = Vec::new();
    loop {
        let page = store.fetch_page(offset, RESOLVE_PAGE_SIZE).await?;
        let received = page.len();
        for devotion in page {
            if full_id.is_some_and(|id| devotion.id == id) {
                return Ok(devotion);
            }
            if devotion.id.to_string().starts_with(&needle) {
                matches.push(devotion);
            }
        }
        if matches.len() > 1 {
            return Err(CliError::AmbiguousDevotionId(format!(
                "Prefix '{id_or_prefix}' matches more than one devotion; use more characters"
            )));
        }
        if received < RESOLVE_PAGE_SIZE {
            break;
        }
        offset += received;
    }

    matches
        .pop()
        .ok_or_else(|| CliError::DevotionNotFound(id_or_prefix.to_string()))
}

/// Parse a publication date argument, defaulting to today
pub fn parse_publication_date(value: Option<&str>) -> Result<NaiveDate, CliError> {
    match value {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| CliError::InvalidDate(raw.to_string())),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

/// Use the provided content, or read the body from piped stdin
pub fn resolve_content(content: Option<&str>) -> Result<String, CliError> {
    if let Some(content) = content {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(CliError::EmptyContent);
        }
        return Ok(trimmed.to_string());
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::EmptyContent);
    }
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyContent);
    }
    Ok(trimmed.to_string())
}
