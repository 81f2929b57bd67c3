//! In-memory note store for tests and local development.
//!
//! Mirrors `PgNoteStore` semantics over a `HashMap`, and additionally counts
//! content writes so tests can assert on idempotence and debounce coalescing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use quill_core::{CreateNoteRequest, Error, Note, NoteStore, Result};

/// In-memory implementation of `NoteStore`.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<HashMap<i64, Note>>,
    next_id: AtomicI64,
    write_count: AtomicUsize,
}

impl MemoryNoteStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            notes: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            write_count: AtomicUsize::new(0),
        }
    }

    /// Seed a note with a fixed id, returning the id.
    pub fn seed(&self, id: i64, owner_id: &str, name: &str, content: &str) -> i64 {
        let now = Utc::now();
        let note = Note {
            id,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().unwrap().insert(id, note);
        // Keep generated ids clear of seeded ones.
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        id
    }

    /// Number of `update_content` calls that reached storage.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Current content of a note, if present.
    pub fn content_of(&self, id: i64) -> Option<String> {
        self.notes.lock().unwrap().get(&id).map(|n| n.content.clone())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, req: CreateNoteRequest) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let note = Note {
            id,
            owner_id: req.owner_id,
            name: req.name,
            content: String::new(),
            image_url: req.image_url,
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().unwrap().insert(id, note);
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        self.notes
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update_content(&self, id: i64, content: &str) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        note.content = content.to_string();
        note.updated_at = Utc::now();
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
