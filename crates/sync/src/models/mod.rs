//! Domain models for sync entities

mod note;
mod task;

pub use note::{NoteId, NoteItem, NoteItemId, NoteList};
pub use task::{NewTask, ProjectId, TaskId};
