//! notely-core - Core library for Notely
//!
//! This crate contains the shared models, the REST client for the notes
//! service, and the observable caches that clients read from.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod util;

pub use api::{ApiClient, CategoriesApi, NotesApi};
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use models::{Category, CategoryId, Note, NoteFilter, NoteId};
pub use store::{CategoryStore, NoteStore, Snapshot};
