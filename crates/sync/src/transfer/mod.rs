//! Transfer engine moving checklist items into tasks
//!
//! One pass drains every configured source list: each open item becomes
//! a task, then the source entry is deleted. Per-item outcomes feed the
//! [`SyncErrorTracker`](crate::health::SyncErrorTracker).

mod engine;
mod timing;

pub use engine::{TransferStats, run_pass, transfer_list};
pub use timing::{IntervalTimer, interval_elapsed};

use anyhow::Result;

use crate::models::{NewTask, NoteItemId, NoteList, ProjectId, TaskId};

/// Source side of a transfer: where checklist items come from
pub trait NotesSource {
    /// Fetch the checklist note with the given title, if it exists
    fn fetch_list(&self, title: &str) -> Result<Option<NoteList>>;

    /// Remove one checklist entry after it was transferred
    fn delete_item(&self, id: &NoteItemId) -> Result<()>;
}

/// Destination side of a transfer: where tasks are created
pub trait TaskSink {
    /// Resolve a project id by display name
    fn project_id(&self, name: &str) -> Result<Option<ProjectId>>;

    /// Resolve a collaborator id by email within a project
    fn collaborator_id(&self, project: &ProjectId, email: &str) -> Result<Option<String>>;

    /// Create a task
    fn create_task(&self, task: &NewTask) -> Result<TaskId>;
}

impl NotesSource for crate::keep::KeepClient {
    fn fetch_list(&self, title: &str) -> Result<Option<NoteList>> {
        self.find_list(title)
    }

    fn delete_item(&self, id: &NoteItemId) -> Result<()> {
        self.delete_item(id)
    }
}

impl TaskSink for crate::todoist::TodoistClient {
    fn project_id(&self, name: &str) -> Result<Option<ProjectId>> {
        self.project_id(name)
    }

    fn collaborator_id(&self, project: &ProjectId, email: &str) -> Result<Option<String>> {
        self.collaborator_id(project, email)
    }

    fn create_task(&self, task: &NewTask) -> Result<TaskId> {
        self.add_task(task)
    }
}
