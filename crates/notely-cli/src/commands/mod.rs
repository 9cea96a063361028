pub mod add;
pub mod archive;
pub mod categories;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod show;
pub mod tag;
