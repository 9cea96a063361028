use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use notely_core::store::Entity;
use notely_core::{ApiClient, Category, CategoryId, CategoryStore, Note, NoteFilter, NoteId, NoteStore};
use serde::Serialize;

use crate::error::CliError;

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub relative_time: String,
    pub categories: Vec<String>,
}

/// Open a note store scoped to `filter`, surfacing a failed load as an error.
pub async fn load_notes(client: &ApiClient, filter: NoteFilter) -> Result<NoteStore<ApiClient>, CliError> {
    let store = NoteStore::new(client.clone(), filter);
    store.fetch().await?;
    Ok(store)
}

pub async fn load_categories(client: &ApiClient) -> Result<CategoryStore<ApiClient>, CliError> {
    let store = CategoryStore::new(client.clone());
    store.fetch().await?;
    Ok(store)
}

/// Resolve a note reference (full id or unique id prefix) against cached notes.
pub fn resolve_note_id(query: &str, notes: &[Note]) -> Result<NoteId, CliError> {
    let query = normalize_reference(query, "Note")?;
    if let Ok(id) = query.parse::<NoteId>() {
        return Ok(id);
    }
    resolve_by_prefix(&query.to_ascii_lowercase(), notes, "Note")
}

/// Resolve a category reference: full id, unique id prefix, or exact name.
pub fn resolve_category_id(query: &str, categories: &[Category]) -> Result<CategoryId, CliError> {
    let query = normalize_reference(query, "Category")?;
    if let Ok(id) = query.parse::<CategoryId>() {
        return Ok(id);
    }
    let name = query.to_lowercase();
    if let Some(category) = categories
        .iter()
        .find(|category| category.name.to_lowercase() == name)
    {
        return Ok(category.id);
    }
    resolve_by_prefix(&query.to_ascii_lowercase(), categories, "Category")
}

fn normalize_reference(query: &str, kind: &'static str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyReference(kind))
    } else {
        Ok(trimmed.to_string())
    }
}

fn resolve_by_prefix<T: Entity>(query: &str, items: &[T], kind: &'static str) -> Result<T::Id, CliError> {
    let matches = items
        .iter()
        .map(Entity::id)
        .filter(|id| id.to_string().starts_with(query))
        .collect::<Vec<_>>();

    match matches.as_slice() {
        [] => Err(CliError::NotFound {
            kind,
            query: query.to_string(),
        }),
        [id] => Ok(*id),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|id| short_id(&id.to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::Ambiguous(format!(
                "{kind} ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

pub fn format_note_lines(notes: &[Note], now: DateTime<Utc>) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let id = short_id(&note.id.to_string());
            let title = truncate(&note.title, 30);
            let relative_time = format_relative_time(note.updated_at, now);
            let marker = if note.is_archived { "[archived] " } else { "" };
            let categories = render_categories(&note.categories);

            if categories.is_empty() {
                format!("{id:<8}  {marker}{title:<30}  {relative_time}")
            } else {
                format!("{id:<8}  {marker}{title:<30}  {relative_time:<10}  {categories}")
            }
        })
        .collect()
}

pub fn format_note_detail(note: &Note) -> String {
    let mut lines = vec![
        format!("{}  {}", note.id, note.title),
        format!(
            "created {}  updated {}{}",
            format_timestamp(note.created_at),
            format_timestamp(note.updated_at),
            if note.is_archived { "  (archived)" } else { "" }
        ),
    ];
    let categories = render_categories(&note.categories);
    if !categories.is_empty() {
        lines.push(categories);
    }
    lines.push(String::new());
    lines.push(note.content.clone());
    lines.join("\n")
}

pub fn note_to_list_item(note: &Note, now: DateTime<Utc>) -> NoteListItem {
    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        preview: note_preview(note, 80),
        content: note.content.clone(),
        is_archived: note.is_archived,
        created_at: note.created_at,
        updated_at: note.updated_at,
        relative_time: format_relative_time(note.updated_at, now),
        categories: sorted_category_names(&note.categories),
    }
}

pub fn format_category_lines(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|category| {
            format!(
                "{:<8}  {}  {}",
                short_id(&category.id.to_string()),
                category.display_color(),
                category.name
            )
        })
        .collect()
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.content.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_chars)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = text.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn sorted_category_names(categories: &[Category]) -> Vec<String> {
    let mut names = categories
        .iter()
        .map(|category| category.name.clone())
        .collect::<Vec<_>>();
    names.sort_by_key(|name| name.to_lowercase());
    names
}

pub fn render_categories(categories: &[Category]) -> String {
    sorted_category_names(categories)
        .into_iter()
        .map(|name| format!("[{name}]"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now
        .signed_duration_since(timestamp)
        .num_milliseconds()
        .max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input_with_initial("")? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("notely-note-{}-{now}.md", std::process::id()))
}
