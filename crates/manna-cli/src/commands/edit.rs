use manna_core::models::Verse;

use crate::commands::common::{parse_publication_date, resolve_devotion, resolve_store};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<&str>,
    reference: Option<&str>,
    verse_text: Option<&str>,
    date: Option<&str>,
    content: Option<&str>,
) -> Result<(), CliError> {
    let store = resolve_store()?;
    let existing = resolve_devotion(&store, id).await?;

    let mut patch = existing.to_patch();
    if let Some(title) = title {
        patch.title = title.trim().to_string();
    }
    if reference.is_some() || verse_text.is_some() {
        let new_reference = reference.map_or_else(
            || existing.verse.reference().to_string(),
            |value| value.trim().to_string(),
        );
        let new_text = verse_text.map_or_else(
            || existing.verse.text().to_string(),
            |value| value.trim().to_string(),
        );
        patch.verse = Verse::from_parts(&new_reference, &new_text);
    }
    if date.is_some() {
        patch.published_on = parse_publication_date(date)?;
    }
    if let Some(content) = content {
        patch.content = content.to_string();
    }

    let updated = store.update_by_id(existing.id, patch).await?;
    println!("{}", updated.id);
    Ok(())
}
