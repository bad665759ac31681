//! Google Keep API integration
//!
//! This module provides:
//! - OAuth2 authentication flow with a cached token
//! - Keep API client for listing notes and deleting checklist entries
//! - Response normalization to domain models

mod auth;
mod client;
mod normalize;

pub use auth::KeepAuth;
pub use client::KeepClient;
pub use normalize::normalize_note;

/// Keep API response types
pub mod api {
    use serde::Deserialize;

    /// Response from listing notes
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListNotesResponse {
        pub notes: Option<Vec<Note>>,
        pub next_page_token: Option<String>,
    }

    /// A note, either free text or a checklist
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Note {
        /// Resource name, e.g. "notes/abc123"
        pub name: String,
        pub title: Option<String>,
        pub body: Option<Body>,
        pub labels: Option<Vec<Label>>,
        pub trashed: Option<bool>,
    }

    /// Note body, one of the content variants is set
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        pub list: Option<ListContent>,
        pub text: Option<TextContent>,
    }

    /// Checklist content of a note
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListContent {
        pub list_items: Option<Vec<ListItem>>,
    }

    /// One checklist entry
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListItem {
        /// Resource name, e.g. "notes/abc123/listItems/def456"
        pub name: String,
        pub text: Option<TextContent>,
        pub checked: Option<bool>,
    }

    /// Plain text wrapper used by notes and list items
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TextContent {
        pub text: Option<String>,
    }

    /// Label attached to a note
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Label {
        pub name: Option<String>,
    }
}
