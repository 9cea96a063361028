use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notely_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Edited note content cannot be empty")]
    EmptyEditedContent,
    #[error("{0} reference cannot be empty")]
    EmptyReference(&'static str),
    #[error("{kind} not found for id/prefix: {query}")]
    NotFound { kind: &'static str, query: String },
    #[error("{0}")]
    Ambiguous(String),
    #[error("Note {note} was created, but attaching a category failed: {source}")]
    PartiallyTagged {
        note: String,
        source: notely_core::Error,
    },
    #[error("Nothing to update; pass at least one field to change")]
    NothingToUpdate,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
