use crate::commands::common::{
    devotion_to_list_item, format_devotion_lines, resolve_store, DevotionListItem,
};
use crate::error::CliError;

pub async fn run_list(limit: usize, page: usize, as_json: bool) -> Result<(), CliError> {
    let store = resolve_store()?;
    let devotions = store.fetch_page(page * limit, limit).await?;

    if as_json {
        let items = devotions
            .iter()
            .map(devotion_to_list_item)
            .collect::<Vec<DevotionListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if devotions.is_empty() {
        println!("No devotions on page {page}");
    } else {
        for line in format_devotion_lines(&devotions) {
            println!("{line}");
        }
    }

    Ok(())
}
