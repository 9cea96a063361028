use notely_core::models::NewNote;
use notely_core::{ApiClient, CategoryId, Note, NoteFilter, NoteStore, NotesApi};

use crate::commands::common::{load_categories, resolve_category_id, resolve_note_content};
use crate::error::CliError;

pub async fn run_add(
    client: &ApiClient,
    title: &str,
    content_parts: &[String],
    category_refs: &[String],
) -> Result<(), CliError> {
    // Resolve categories before creating anything so a bad reference aborts cleanly.
    let category_ids = if category_refs.is_empty() {
        Vec::new()
    } else {
        let categories = load_categories(client).await?.snapshot().items;
        category_refs
            .iter()
            .map(|query| resolve_category_id(query, &categories))
            .collect::<Result<Vec<_>, _>>()?
    };

    let content = resolve_note_content(content_parts)?;
    let notes = NoteStore::new(client.clone(), NoteFilter::active());
    let note = notes.create(&NewNote::new(title.trim(), content)).await?;
    let note = attach_categories(&notes, note, &category_ids).await?;

    tracing::info!(note = %note.id, categories = category_ids.len(), "Created note");
    println!("{}", note.id);
    Ok(())
}

/// Tag a freshly created note; a failure names the note so it can be fixed up.
pub async fn attach_categories<A: NotesApi>(
    notes: &NoteStore<A>,
    mut note: Note,
    category_ids: &[CategoryId],
) -> Result<Note, CliError> {
    for category_id in category_ids {
        note = notes
            .add_category(&note.id, category_id)
            .await
            .map_err(|source| CliError::PartiallyTagged {
                note: note.id.to_string(),
                source,
            })?;
    }
    Ok(note)
}
