//! Data model for quill notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted note (one notebook document).
///
/// `content` holds the serialized rich-text markup of the document body.
/// An empty `content` means the note has never been edited; sessions render
/// it as a bare `<h1>{name}</h1>` heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Serial id assigned by the store at creation; immutable afterwards.
    pub id: i64,
    /// Identity of the owning user, as issued by the identity provider.
    pub owner_id: String,
    /// Display name of the notebook.
    pub name: String,
    /// Serialized rich-text document markup.
    pub content: String,
    /// Cover image URL chosen at creation.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// The document markup a fresh editing session starts from.
    ///
    /// Stored content wins; an untouched note falls back to a heading with
    /// the notebook name.
    pub fn initial_document(&self) -> String {
        if self.content.is_empty() {
            format!("<h1>{}</h1>", self.name)
        } else {
            self.content.clone()
        }
    }
}

/// Request for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub owner_id: String,
    pub name: String,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note(content: &str) -> Note {
        Note {
            id: 1,
            owner_id: "user_1".to_string(),
            name: "Travel Journal".to_string(),
            content: content.to_string(),
            image_url: "https://example.com/cover.jpg".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn initial_document_prefers_stored_content() {
        let note = sample_note("<p>already written</p>");
        assert_eq!(note.initial_document(), "<p>already written</p>");
    }

    #[test]
    fn initial_document_falls_back_to_heading() {
        let note = sample_note("");
        assert_eq!(note.initial_document(), "<h1>Travel Journal</h1>");
    }

    #[test]
    fn note_round_trips_through_json() {
        let note = sample_note("<p>hi</p>");
        let json = serde_json::to_string(&note).unwrap();
        let parsed: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, note);
    }
}
