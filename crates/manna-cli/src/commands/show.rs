use crate::commands::common::{resolve_devotion, resolve_store};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool) -> Result<(), CliError> {
    let store = resolve_store()?;
    let devotion = resolve_devotion(&store, id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&devotion)?);
    } else {
        println!("{}", devotion.title);
        println!("{}", devotion.verse.reference());
        if !devotion.verse.text().is_empty() {
            println!("\"{}\"", devotion.verse.text());
        }
        println!("published {}", devotion.published_on.format("%Y-%m-%d"));
        println!();
        println!("{}", devotion.content);
    }

    Ok(())
}
