//! Common types and traits shared across the thoughts crates.
//!
//! This crate provides the note model, the closed category set with its
//! keyword and display table, the error types, and the storage trait that
//! the pipeline and the adapters program against.

pub mod error;
pub mod note;
pub mod text;
pub mod traits;

pub use error::{InferenceError, Result, ThoughtsError};
pub use note::{
    CATEGORY_TABLE, Category, CategoryInfo, CategoryStats, MAX_SUMMARY_CHARS, MIN_NOTE_CHARS, Note,
    ProcessedNote,
};
pub use traits::NoteStore;
