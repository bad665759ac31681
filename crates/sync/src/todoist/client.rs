//! Todoist REST API HTTP client
//!
//! Read-only lookups (projects, collaborators) retry with exponential
//! backoff; task creation deliberately does not, since a retried create
//! after an ambiguous failure would duplicate the task.

use anyhow::{Context, Result};
use std::time::Duration;

use super::api::{Collaborator, CreateTaskRequest, Project, Task};
use crate::models::{NewTask, ProjectId, TaskId};

/// Todoist REST API client
pub struct TodoistClient {
    token: String,
}

impl TodoistClient {
    /// Todoist REST API base URL
    const BASE_URL: &'static str = "https://api.todoist.com/rest/v2";

    /// Retries for idempotent lookups
    const MAX_RETRIES: u32 = 3;

    /// Due strings are always interpreted as English
    const DUE_LANG: &'static str = "en";

    /// Create a new Todoist client with a personal API token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// List all projects
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.get_with_retry("projects")
            .context("Failed to list projects")
    }

    /// Resolve a project id by its display name
    pub fn project_id(&self, name: &str) -> Result<Option<ProjectId>> {
        let projects = self.projects()?;
        Ok(projects
            .into_iter()
            .find(|project| project.name == name)
            .map(|project| ProjectId::new(project.id)))
    }

    /// List the collaborators of a shared project
    pub fn collaborators(&self, project: &ProjectId) -> Result<Vec<Collaborator>> {
        self.get_with_retry(&format!("projects/{}/collaborators", project.as_str()))
            .with_context(|| {
                format!(
                    "Failed to list collaborators of project {}",
                    project.as_str()
                )
            })
    }

    /// Resolve a collaborator id by email address
    pub fn collaborator_id(&self, project: &ProjectId, email: &str) -> Result<Option<String>> {
        let collaborators = self.collaborators(project)?;
        Ok(collaborators
            .into_iter()
            .find(|collaborator| collaborator.email.eq_ignore_ascii_case(email))
            .map(|collaborator| collaborator.id))
    }

    /// Create a task; NOT retried (creation is not idempotent)
    pub fn add_task(&self, task: &NewTask) -> Result<TaskId> {
        let request = CreateTaskRequest {
            content: task.content.clone(),
            project_id: task.project_id.as_ref().map(|id| id.as_str().to_string()),
            due_string: task.due_string.clone(),
            due_lang: task.due_string.as_ref().map(|_| Self::DUE_LANG.to_string()),
            labels: task.labels.clone(),
            assignee_id: task.assignee_id.clone(),
        };

        let url = format!("{}/tasks", Self::BASE_URL);
        let mut response = ureq::post(&url)
            .header("Authorization", &format!("Bearer {}", self.token))
            .send_json(&request)
            .with_context(|| format!("Failed to create task '{}'", task.content))?;

        let created: Task = response
            .body_mut()
            .read_json()
            .context("Failed to parse create task response")?;

        Ok(TaskId::new(created.id))
    }

    /// GET a JSON resource with exponential backoff and jitter
    fn get_with_retry<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", Self::BASE_URL, path);
        let mut last_error = None;
        let mut delay = Duration::from_millis(100);

        for attempt in 0..Self::MAX_RETRIES {
            let result = ureq::get(&url)
                .header("Authorization", &format!("Bearer {}", self.token))
                .call();

            match result {
                Ok(mut response) => {
                    return response
                        .body_mut()
                        .read_json()
                        .with_context(|| format!("Failed to parse response from {}", path));
                }
                Err(e) => {
                    last_error = Some(anyhow::Error::new(e));
                    if attempt < Self::MAX_RETRIES - 1 {
                        let jitter = Duration::from_millis(rand_jitter());
                        std::thread::sleep(delay + jitter);
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("request to {} failed", path)))
    }
}

/// Generate a random jitter value (0-100ms)
fn rand_jitter() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    hasher.finish() % 100
}
