//! Keep API HTTP client
//!
//! Provides methods for fetching checklist notes and deleting
//! transferred entries. Uses synchronous HTTP (ureq) so the serial
//! scheduler loop needs no executor.

use anyhow::{Context, Result};

use super::api::{ListNotesResponse, Note};
use super::{KeepAuth, normalize_note};
use crate::models::{NoteItemId, NoteList};

/// Keep API client
pub struct KeepClient {
    auth: KeepAuth,
}

impl KeepClient {
    /// Keep API base URL
    const BASE_URL: &'static str = "https://keep.googleapis.com/v1";

    /// Notes fetched per page (API maximum)
    const PAGE_SIZE: usize = 100;

    /// Create a new Keep client
    pub fn new(auth: KeepAuth) -> Self {
        Self { auth }
    }

    /// List one page of notes
    ///
    /// # Arguments
    /// * `page_token` - Optional page token for pagination
    pub fn list_notes(&self, page_token: Option<&str>) -> Result<ListNotesResponse> {
        let access_token = self.auth.access_token()?;

        let mut url = format!("{}/notes?pageSize={}", Self::BASE_URL, Self::PAGE_SIZE);
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", token));
        }

        let mut response = ureq::get(&url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .call()
            .context("Failed to send list notes request")?;

        let list: ListNotesResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse list notes response")?;

        Ok(list)
    }

    /// List ALL notes, following pagination
    pub fn list_notes_all(&self) -> Result<Vec<Note>> {
        let mut all_notes = Vec::new();
        let mut page_token = None;

        loop {
            let response = self.list_notes(page_token.as_deref())?;

            if let Some(notes) = response.notes {
                all_notes.extend(notes);
            }

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_notes)
    }

    /// Find the checklist note with the given title
    ///
    /// Returns the first matching checklist; plain text notes with the
    /// same title are ignored.
    pub fn find_list(&self, title: &str) -> Result<Option<NoteList>> {
        let notes = self.list_notes_all()?;
        Ok(notes
            .into_iter()
            .filter_map(normalize_note)
            .find(|list| list.title == title))
    }

    /// Delete one checklist entry by its resource name
    pub fn delete_item(&self, id: &NoteItemId) -> Result<()> {
        let access_token = self.auth.access_token()?;

        let url = format!("{}/{}", Self::BASE_URL, id.as_str());

        ureq::delete(&url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .call()
            .with_context(|| format!("Failed to delete checklist item {}", id.as_str()))?;

        Ok(())
    }

    /// Check if the client has usable credentials
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Trigger the authentication flow up front
    pub fn authenticate(&self) -> Result<()> {
        self.auth.access_token()?;
        Ok(())
    }
}
