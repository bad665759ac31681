//! Note models representing Google Keep checklists

use serde::{Deserialize, Serialize};

/// Unique identifier for a note (Keep resource name, e.g. "notes/abc123")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a checklist entry within a note
/// (Keep resource name, e.g. "notes/abc123/listItems/def456")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteItemId(pub String);

impl NoteItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NoteItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One checklist entry within a source list
///
/// The item `text` doubles as the item's identity for error tracking;
/// Keep item ids change when a note is re-created, free text does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteItem {
    pub id: NoteItemId,
    pub text: String,
    /// Checked entries were already handled in Keep and are never transferred
    pub checked: bool,
}

impl NoteItem {
    pub fn new(id: impl Into<NoteItemId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            checked: false,
        }
    }
}

/// A named checklist note in the notes provider, configured for transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteList {
    pub id: NoteId,
    pub title: String,
    pub items: Vec<NoteItem>,
    /// Label names attached to the note, copied to tasks when enabled
    pub labels: Vec<String>,
}

impl NoteList {
    pub fn new(id: impl Into<NoteId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Items that still need to be transferred
    pub fn open_items(&self) -> impl Iterator<Item = &NoteItem> {
        self.items.iter().filter(|item| !item.checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_items_skips_checked() {
        let mut list = NoteList::new("notes/n1", "Groceries");
        list.items.push(NoteItem::new("notes/n1/listItems/i1", "milk"));
        let mut done = NoteItem::new("notes/n1/listItems/i2", "bread");
        done.checked = true;
        list.items.push(done);

        let open: Vec<_> = list.open_items().collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].text, "milk");
    }

    #[test]
    fn test_note_id_roundtrip() {
        let id = NoteId::new("notes/abc");
        assert_eq!(id.as_str(), "notes/abc");
        assert_eq!(NoteId::from("notes/abc"), id);
    }
}
