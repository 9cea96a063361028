use notely_core::{ApiClient, NoteFilter};

use crate::commands::common::{load_notes, resolve_note_id};
use crate::error::CliError;

/// Archive a note from the active view.
pub async fn run_archive(client: &ApiClient, id: &str) -> Result<(), CliError> {
    let store = load_notes(client, NoteFilter::active()).await?;
    let note_id = resolve_note_id(id, &store.snapshot().items)?;

    let note = store.archive(&note_id).await?;
    println!("Archived {}", note.id);
    Ok(())
}

/// Restore a note from the archived view.
pub async fn run_unarchive(client: &ApiClient, id: &str) -> Result<(), CliError> {
    let store = load_notes(client, NoteFilter::archived()).await?;
    let note_id = resolve_note_id(id, &store.snapshot().items)?;

    let note = store.unarchive(&note_id).await?;
    println!("Restored {}", note.id);
    Ok(())
}
