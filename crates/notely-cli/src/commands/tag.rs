use notely_core::{ApiClient, CategoryId, NoteFilter, NoteId, NoteStore};

use crate::commands::common::{
    load_categories, load_notes, render_categories, resolve_category_id, resolve_note_id,
};
use crate::error::CliError;

pub async fn run_tag(client: &ApiClient, note: &str, category: &str) -> Result<(), CliError> {
    let (store, note_id, category_id) = resolve_pair(client, note, category).await?;
    let note = store.add_category(&note_id, &category_id).await?;
    println!("{}  {}", note.id, render_categories(&note.categories));
    Ok(())
}

pub async fn run_untag(client: &ApiClient, note: &str, category: &str) -> Result<(), CliError> {
    let (store, note_id, category_id) = resolve_pair(client, note, category).await?;
    let note = store.remove_category(&note_id, &category_id).await?;
    println!("{}  {}", note.id, render_categories(&note.categories));
    Ok(())
}

async fn resolve_pair(
    client: &ApiClient,
    note: &str,
    category: &str,
) -> Result<(NoteStore<ApiClient>, NoteId, CategoryId), CliError> {
    let store = load_notes(client, NoteFilter::default()).await?;
    let note_id = resolve_note_id(note, &store.snapshot().items)?;
    let categories = load_categories(client).await?;
    let category_id = resolve_category_id(category, &categories.snapshot().items)?;
    Ok((store, note_id, category_id))
}
