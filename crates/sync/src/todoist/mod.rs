//! Todoist REST API integration
//!
//! This module provides:
//! - REST v2 client with bearer-token auth
//! - Project and collaborator lookups for task routing
//! - Task creation from transferred checklist items

mod client;

pub use client::TodoistClient;

/// Todoist REST API types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// A project in the user's workspace
    #[derive(Debug, Clone, Deserialize)]
    pub struct Project {
        pub id: String,
        pub name: String,
    }

    /// A collaborator on a shared project
    #[derive(Debug, Clone, Deserialize)]
    pub struct Collaborator {
        pub id: String,
        pub name: String,
        pub email: String,
    }

    /// Request body for creating a task
    #[derive(Debug, Serialize)]
    pub struct CreateTaskRequest {
        pub content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub project_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub due_string: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub due_lang: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub labels: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub assignee_id: Option<String>,
    }

    /// Response to a created task (fields we consume)
    #[derive(Debug, Deserialize)]
    pub struct Task {
        pub id: String,
    }
}

#[cfg(test)]
mod tests {
    use super::api::*;

    #[test]
    fn test_create_task_request_omits_unset_fields() {
        let request = CreateTaskRequest {
            content: "milk".into(),
            project_id: None,
            due_string: None,
            due_lang: None,
            labels: Vec::new(),
            assignee_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "milk" }));
    }

    #[test]
    fn test_create_task_request_full() {
        let request = CreateTaskRequest {
            content: "milk".into(),
            project_id: Some("2203306141".into()),
            due_string: Some("today".into()),
            due_lang: Some("en".into()),
            labels: vec!["shopping".into()],
            assignee_id: Some("42".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["project_id"], "2203306141");
        assert_eq!(json["due_string"], "today");
        assert_eq!(json["due_lang"], "en");
        assert_eq!(json["labels"][0], "shopping");
        assert_eq!(json["assignee_id"], "42");
    }

    #[test]
    fn test_parse_project_list() {
        let projects: Vec<Project> = serde_json::from_str(
            r#"[
                { "id": "2203306141", "name": "Shopping", "color": "charcoal", "is_shared": true },
                { "id": "2203306142", "name": "Chores", "color": "red", "is_shared": false }
            ]"#,
        )
        .unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Shopping");
    }

    #[test]
    fn test_parse_collaborators() {
        let collaborators: Vec<Collaborator> = serde_json::from_str(
            r#"[ { "id": "42", "name": "Partner", "email": "partner@example.com" } ]"#,
        )
        .unwrap();
        assert_eq!(collaborators[0].email, "partner@example.com");
    }
}
