//! Normalization of Keep API responses to domain models

use crate::models::{NoteItem, NoteItemId, NoteList};

use super::api;

/// Convert an API note into a [`NoteList`]
///
/// Returns `None` for notes that are not checklists (plain text notes)
/// or that sit in the trash; those are never sync sources.
pub fn normalize_note(note: api::Note) -> Option<NoteList> {
    if note.trashed.unwrap_or(false) {
        return None;
    }

    let list_content = note.body.and_then(|body| body.list)?;

    let mut result = NoteList::new(note.name, note.title.unwrap_or_default());

    for api_item in list_content.list_items.unwrap_or_default() {
        let text = api_item
            .text
            .and_then(|t| t.text)
            .unwrap_or_default()
            .trim()
            .to_string();
        // Keep keeps empty placeholder rows around, skip them
        if text.is_empty() {
            continue;
        }
        result.items.push(NoteItem {
            id: NoteItemId::new(api_item.name),
            text,
            checked: api_item.checked.unwrap_or(false),
        });
    }

    result.labels = note
        .labels
        .unwrap_or_default()
        .into_iter()
        .filter_map(|label| label.name)
        .collect();

    Some(result)
}
