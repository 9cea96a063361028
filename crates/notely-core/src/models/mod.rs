//! Data models for Notely

mod category;
mod note;
mod validate;

pub use category::{
    Category, CategoryChanges, CategoryId, NewCategory, DEFAULT_CATEGORY_COLOR,
};
pub use note::{Note, NoteChanges, NoteFilter, NoteId, NewNote};
