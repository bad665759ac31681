//! Task models for the destination task service

use serde::{Deserialize, Serialize};

/// Unique identifier for a Todoist project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a created task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Creation request for a task in the destination service
///
/// Without a `project_id` the task lands in the user's inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub content: String,
    pub project_id: Option<ProjectId>,
    /// Natural-language due string, always parsed as English ("today", "every monday")
    pub due_string: Option<String>,
    pub labels: Vec<String>,
    pub assignee_id: Option<String>,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            project_id: None,
            due_string: None,
            labels: Vec::new(),
            assignee_id: None,
        }
    }
}
