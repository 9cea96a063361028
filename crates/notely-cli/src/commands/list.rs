use chrono::Utc;
use notely_core::{ApiClient, NoteFilter};

use crate::cli::ViewArgs;
use crate::commands::common::{
    format_note_lines, load_categories, load_notes, note_to_list_item, resolve_category_id,
    NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    client: &ApiClient,
    view: ViewArgs,
    category: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let category_id = match category {
        Some(query) => {
            let categories = load_categories(client).await?;
            Some(resolve_category_id(query, &categories.snapshot().items)?)
        }
        None => None,
    };

    let filter = NoteFilter {
        archived: view.archived_filter(),
        category_id,
    };
    let notes = load_notes(client, filter).await?.snapshot().items;
    let now = Utc::now();

    if as_json {
        let json_items = notes
            .iter()
            .map(|note| note_to_list_item(note, now))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if notes.is_empty() {
        println!("No notes found");
    } else {
        for line in format_note_lines(&notes, now) {
            println!("{line}");
        }
    }

    Ok(())
}
