use notely_core::{ApiClient, NoteFilter};

use crate::commands::common::{load_notes, resolve_note_id};
use crate::error::CliError;

pub async fn run_delete(client: &ApiClient, id: &str) -> Result<(), CliError> {
    let store = load_notes(client, NoteFilter::default()).await?;
    let note_id = resolve_note_id(id, &store.snapshot().items)?;

    store.delete(&note_id).await?;
    println!("{note_id}");
    Ok(())
}
