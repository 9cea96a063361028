use chrono::Utc;
use notely_core::{ApiClient, NoteFilter};

use crate::commands::common::{format_note_detail, load_notes, note_to_list_item, resolve_note_id};
use crate::error::CliError;

pub async fn run_show(client: &ApiClient, id: &str, as_json: bool) -> Result<(), CliError> {
    let store = load_notes(client, NoteFilter::default()).await?;
    let note_id = resolve_note_id(id, &store.snapshot().items)?;
    let note = store.get(&note_id).await?;

    if as_json {
        let item = note_to_list_item(&note, Utc::now());
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("{}", format_note_detail(&note));
    }
    Ok(())
}
