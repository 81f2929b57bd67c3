//! Idempotent note synchronization.
//!
//! The autosave client sits between the editor and the store: it validates
//! input, compares against the stored copy before writing, and stamps every
//! attempt with a monotonically increasing sequence number so that two saves
//! in flight at once cannot regress the note to older content, whatever
//! order the transport completes them in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use quill_core::{Error, NoteStore, Result};

/// What a save attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content differed from the stored copy and was written.
    Written,
    /// Stored copy already matched; no write issued.
    Unchanged,
    /// A later attempt already applied for this note; no write issued.
    Stale,
}

/// Compare-then-write synchronization of note content.
pub struct AutosaveClient {
    store: Arc<dyn NoteStore>,
    next_seq: AtomicU64,
    highest_applied: Mutex<HashMap<i64, u64>>,
}

impl AutosaveClient {
    /// Create a new client over the given store.
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self {
            store,
            next_seq: AtomicU64::new(0),
            highest_applied: Mutex::new(HashMap::new()),
        }
    }

    /// Save `content` for `note_id`, assigning the next sequence number.
    pub async fn save(&self, note_id: i64, content: &str) -> Result<SaveOutcome> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.save_sequenced(note_id, content, seq).await
    }

    /// Save with an explicit sequence number.
    ///
    /// An attempt whose sequence is below the highest already applied for
    /// the note is reported as [`SaveOutcome::Stale`] and performs no write.
    pub async fn save_sequenced(
        &self,
        note_id: i64,
        content: &str,
        seq: u64,
    ) -> Result<SaveOutcome> {
        if note_id <= 0 {
            return Err(Error::InvalidInput(
                "noteId must be a positive integer".to_string(),
            ));
        }
        if content.is_empty() {
            return Err(Error::InvalidInput(
                "editorState must not be empty".to_string(),
            ));
        }

        // NoteNotFound propagates; a store uniqueness violation surfaces
        // from the store itself as Internal.
        let note = self.store.fetch(note_id).await?;

        if self.is_stale(note_id, seq) {
            debug!(note_id, seq, "Skipping stale save attempt");
            return Ok(SaveOutcome::Stale);
        }

        if note.content == content {
            self.mark_applied(note_id, seq);
            debug!(note_id, seq, "Content unchanged; no write issued");
            return Ok(SaveOutcome::Unchanged);
        }

        // Recheck after the fetch await: a later attempt may have applied
        // while this one was suspended.
        if self.is_stale(note_id, seq) {
            debug!(note_id, seq, "Skipping stale save attempt");
            return Ok(SaveOutcome::Stale);
        }

        self.store.update_content(note_id, content).await?;
        self.mark_applied(note_id, seq);

        debug!(note_id, seq, content_len = content.len(), "Note saved");
        Ok(SaveOutcome::Written)
    }

    fn is_stale(&self, note_id: i64, seq: u64) -> bool {
        let applied = self.highest_applied.lock().unwrap();
        applied.get(&note_id).copied().unwrap_or(0) > seq
    }

    fn mark_applied(&self, note_id: i64, seq: u64) {
        let mut applied = self.highest_applied.lock().unwrap();
        let entry = applied.entry(note_id).or_insert(0);
        *entry = (*entry).max(seq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_db::MemoryNoteStore;

    fn client_with_note(id: i64, content: &str) -> (Arc<MemoryNoteStore>, AutosaveClient) {
        let store = Arc::new(MemoryNoteStore::new());
        store.seed(id, "user_1", "Test", content);
        let client = AutosaveClient::new(store.clone());
        (store, client)
    }

    #[tokio::test]
    async fn repeated_identical_saves_write_once() {
        let (store, client) = client_with_note(7, "");

        let first = client.save(7, "<h1>X</h1>").await.unwrap();
        let second = client.save(7, "<h1>X</h1>").await.unwrap();

        assert_eq!(first, SaveOutcome::Written);
        assert_eq!(second, SaveOutcome::Unchanged);
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.content_of(7).unwrap(), "<h1>X</h1>");
    }

    #[tokio::test]
    async fn only_content_changes_are_written() {
        let (store, client) = client_with_note(7, "<p>same</p>");

        let outcome = client.save(7, "<p>same</p>").await.unwrap();

        assert_eq!(outcome, SaveOutcome::Unchanged);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn nonpositive_note_id_is_invalid_input() {
        let (_store, client) = client_with_note(7, "");
        match client.save(0, "<p>x</p>").await {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("noteId")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_content_is_invalid_input() {
        let (_store, client) = client_with_note(7, "");
        match client.save(7, "").await {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("editorState")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_note_is_not_found_and_writes_nothing() {
        let (store, client) = client_with_note(7, "");
        match client.save(999, "<p>x</p>").await {
            Err(Error::NoteNotFound(999)) => {}
            other => panic!("expected NoteNotFound, got {:?}", other),
        }
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn out_of_order_save_is_rejected_as_stale() {
        let (store, client) = client_with_note(7, "");

        // The newer attempt lands first; the older one must not clobber it.
        let newer = client.save_sequenced(7, "<p>v2</p>", 2).await.unwrap();
        let older = client.save_sequenced(7, "<p>v1</p>", 1).await.unwrap();

        assert_eq!(newer, SaveOutcome::Written);
        assert_eq!(older, SaveOutcome::Stale);
        assert_eq!(store.content_of(7).unwrap(), "<p>v2</p>");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn sequences_are_tracked_per_note() {
        let store = Arc::new(MemoryNoteStore::new());
        store.seed(1, "user_1", "A", "");
        store.seed(2, "user_1", "B", "");
        let client = AutosaveClient::new(store.clone());

        client.save_sequenced(1, "<p>a2</p>", 2).await.unwrap();
        // Note 2 has no applied sequence yet; seq 1 is fine there.
        let outcome = client.save_sequenced(2, "<p>b1</p>", 1).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Written);
    }
}
