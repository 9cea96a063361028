//! Remote service access.
//!
//! The stores talk to the service through [`NotesApi`] and [`CategoriesApi`];
//! [`ApiClient`] is the HTTP implementation of both.

mod client;

pub use client::ApiClient;

use crate::error::Result;
use crate::models::{
    Category, CategoryChanges, CategoryId, NewCategory, NewNote, Note, NoteChanges, NoteFilter,
    NoteId,
};

/// Operations on the notes collection
#[allow(async_fn_in_trait)]
pub trait NotesApi {
    /// List notes matching the filter
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>>;

    /// Get a single note
    async fn get_note(&self, id: &NoteId) -> Result<Note>;

    /// Create a note and return the stored representation
    async fn create_note(&self, note: &NewNote) -> Result<Note>;

    /// Apply a partial update to a note
    async fn update_note(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note>;

    /// Permanently delete a note
    async fn delete_note(&self, id: &NoteId) -> Result<()>;

    /// Mark a note archived
    async fn archive_note(&self, id: &NoteId) -> Result<Note>;

    /// Clear a note's archived flag
    async fn unarchive_note(&self, id: &NoteId) -> Result<Note>;

    /// Attach a category to a note
    async fn add_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note>;

    /// Detach a category from a note
    async fn remove_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note>;
}

/// Operations on the categories collection
#[allow(async_fn_in_trait)]
pub trait CategoriesApi {
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, id: &CategoryId) -> Result<Category>;

    async fn create_category(&self, category: &NewCategory) -> Result<Category>;

    async fn update_category(&self, id: &CategoryId, changes: &CategoryChanges)
        -> Result<Category>;

    async fn delete_category(&self, id: &CategoryId) -> Result<()>;
}
