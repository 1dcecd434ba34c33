use crate::commands::common::{resolve_devotion, resolve_store};
use crate::error::CliError;

pub async fn run_delete(id: &str) -> Result<(), CliError> {
    let store = resolve_store()?;
    let devotion = resolve_devotion(&store, id).await?;

    store.delete_by_id(devotion.id).await?;
    println!("{}", devotion.id);
    Ok(())
}
