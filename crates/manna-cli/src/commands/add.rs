use manna_core::models::{NewDevotion, Verse};

use crate::commands::common::{parse_publication_date, resolve_content, resolve_store};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    reference: &str,
    verse_text: &str,
    date: Option<&str>,
    content: Option<&str>,
) -> Result<(), CliError> {
    let published_on = parse_publication_date(date)?;
    let content = resolve_content(content)?;

    let store = resolve_store()?;
    let created = store
        .insert(NewDevotion {
            title: title.trim().to_string(),
            verse: Verse::from_parts(reference, verse_text),
            content,
            published_on,
        })
        .await?;

    println!("{}", created.id);
    Ok(())
}
