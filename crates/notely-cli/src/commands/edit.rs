use notely_core::models::NoteChanges;
use notely_core::{ApiClient, NoteFilter};

use crate::commands::common::{capture_editor_input_with_initial, load_notes, resolve_note_id};
use crate::error::CliError;

pub async fn run_edit(
    client: &ApiClient,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), CliError> {
    let store = load_notes(client, NoteFilter::default()).await?;
    let note_id = resolve_note_id(id, &store.snapshot().items)?;

    let changes = if title.is_none() && content.is_none() {
        let note = store.get(&note_id).await?;
        let Some(edited_content) = capture_editor_input_with_initial(&note.content)? else {
            return Err(CliError::EmptyEditedContent);
        };

        if edited_content == note.content {
            println!("{}", note.id);
            return Ok(());
        }

        NoteChanges {
            title: None,
            content: Some(edited_content),
        }
    } else {
        NoteChanges {
            title: title.map(|title| title.trim().to_string()),
            content: content.map(|content| content.trim().to_string()),
        }
    };

    if changes.is_empty() {
        return Err(CliError::NothingToUpdate);
    }

    let updated = store.update(&note_id, &changes).await?;
    println!("{}", updated.id);
    Ok(())
}
