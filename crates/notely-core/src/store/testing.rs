//! In-memory stand-in for the notes service used by store tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::Semaphore;

use crate::api::{CategoriesApi, NotesApi};
use crate::error::{Error, Result};
use crate::models::{
    Category, CategoryChanges, CategoryId, NewCategory, NewNote, Note, NoteChanges, NoteFilter,
    NoteId,
};

#[derive(Clone, Default)]
pub struct FakeService {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    notes: Mutex<Vec<Note>>,
    categories: Mutex<Vec<Category>>,
    failing: AtomicBool,
    list_gate: Mutex<Option<Arc<Semaphore>>>,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with HTTP 503.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold every list request until a permit is added to the returned gate.
    pub fn gate_lists(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.inner.list_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    async fn pass_list_gate(&self) {
        let gate = self.inner.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.inner.mutation_calls.load(Ordering::SeqCst)
    }

    /// Insert a note directly, newest first.
    pub fn seed_note(&self, title: &str, is_archived: bool) -> Note {
        let now = Utc::now();
        let note = Note {
            id: NoteId::new(),
            title: title.to_string(),
            content: format!("{title} body"),
            is_archived,
            created_at: now,
            updated_at: now,
            categories: Vec::new(),
        };
        self.inner.notes.lock().unwrap().insert(0, note.clone());
        note
    }

    pub fn seed_category(&self, name: &str) -> Category {
        let category = Category {
            id: CategoryId::new(),
            name: name.to_string(),
            color: None,
            created_at: Utc::now(),
        };
        self.inner
            .categories
            .lock()
            .unwrap()
            .push(category.clone());
        category
    }

    /// Associate directly, bypassing call accounting.
    pub fn attach(&self, note_id: &NoteId, category_id: &CategoryId) {
        let category = self.find_category(category_id).unwrap();
        let mut notes = self.inner.notes.lock().unwrap();
        let note = notes.iter_mut().find(|note| note.id == *note_id).unwrap();
        note.categories.push(category);
    }

    fn check(&self) -> Result<()> {
        if self.inner.failing.load(Ordering::SeqCst) {
            Err(Error::Api {
                status: 503,
                message: "Service unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn mutate(&self) -> Result<()> {
        self.inner.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.check()
    }

    fn find_category(&self, id: &CategoryId) -> Result<Category> {
        self.inner
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|category| category.id == *id)
            .cloned()
            .ok_or_else(|| not_found("Category"))
    }

    fn edit_note(&self, id: &NoteId, edit: impl FnOnce(&mut Note)) -> Result<Note> {
        let mut notes = self.inner.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|note| note.id == *id)
            .ok_or_else(|| not_found("Note"))?;
        edit(note);
        note.updated_at = Utc::now();
        Ok(note.clone())
    }
}

fn not_found(kind: &str) -> Error {
    Error::Api {
        status: 404,
        message: format!("{kind} not found"),
    }
}

impl NotesApi for FakeService {
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_list_gate().await;
        self.check()?;
        let notes = self.inner.notes.lock().unwrap();
        Ok(notes.iter().filter(|note| filter.matches(note)).cloned().collect())
    }

    async fn get_note(&self, id: &NoteId) -> Result<Note> {
        self.check()?;
        self.inner
            .notes
            .lock()
            .unwrap()
            .iter()
            .find(|note| note.id == *id)
            .cloned()
            .ok_or_else(|| not_found("Note"))
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        self.mutate()?;
        let now = Utc::now();
        let created = Note {
            id: NoteId::new(),
            title: note.title.clone(),
            content: note.content.clone(),
            is_archived: false,
            created_at: now,
            updated_at: now,
            categories: Vec::new(),
        };
        self.inner.notes.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn update_note(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note> {
        self.mutate()?;
        self.edit_note(id, |note| {
            if let Some(title) = &changes.title {
                note.title.clone_from(title);
            }
            if let Some(content) = &changes.content {
                note.content.clone_from(content);
            }
        })
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        self.mutate()?;
        let mut notes = self.inner.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|note| note.id != *id);
        if notes.len() == before {
            return Err(not_found("Note"));
        }
        Ok(())
    }

    async fn archive_note(&self, id: &NoteId) -> Result<Note> {
        self.mutate()?;
        self.edit_note(id, |note| note.is_archived = true)
    }

    async fn unarchive_note(&self, id: &NoteId) -> Result<Note> {
        self.mutate()?;
        self.edit_note(id, |note| note.is_archived = false)
    }

    async fn add_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note> {
        self.mutate()?;
        let category = self.find_category(category_id)?;
        self.edit_note(note_id, |note| {
            if !note.has_category(&category.id) {
                note.categories.push(category);
            }
        })
    }

    async fn remove_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note> {
        self.mutate()?;
        self.edit_note(note_id, |note| {
            note.categories.retain(|category| category.id != *category_id);
        })
    }
}

impl CategoriesApi for FakeService {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.inner.categories.lock().unwrap().clone())
    }

    async fn get_category(&self, id: &CategoryId) -> Result<Category> {
        self.check()?;
        self.find_category(id)
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        self.mutate()?;
        let created = Category {
            id: CategoryId::new(),
            name: category.name.clone(),
            color: category.color.clone(),
            created_at: Utc::now(),
        };
        self.inner
            .categories
            .lock()
            .unwrap()
            .push(created.clone());
        Ok(created)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        changes: &CategoryChanges,
    ) -> Result<Category> {
        self.mutate()?;
        let mut categories = self.inner.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|category| category.id == *id)
            .ok_or_else(|| not_found("Category"))?;
        if let Some(name) = &changes.name {
            category.name.clone_from(name);
        }
        if let Some(color) = &changes.color {
            category.color = Some(color.clone());
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<()> {
        self.mutate()?;
        let mut categories = self.inner.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|category| category.id != *id);
        if categories.len() == before {
            return Err(not_found("Category"));
        }
        Ok(())
    }
}
