//! AI continuation dispatch.
//!
//! At most one completion request is in flight per session. The busy state
//! clears on every exit path, including validation failures and provider
//! errors, so a failed request never wedges the session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use quill_core::{CompletionBackend, Result};

use crate::editor::EditorSession;
use crate::prompt::extract_prompt;

/// Lifecycle of the session's completion slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionState {
    Idle,
    Pending(u64),
}

/// What a completion request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The provider's continuation, already spliced into the document.
    Inserted(String),
    /// Another request was in flight; this one was not dispatched.
    AlreadyPending,
    /// The session closed while the provider was working; the result was
    /// dropped without touching the document.
    Discarded,
}

/// Serializes completion requests for one editor session.
pub struct CompletionDispatcher {
    session: Arc<EditorSession>,
    backend: Arc<dyn CompletionBackend>,
    state: Mutex<CompletionState>,
    next_request_id: AtomicU64,
}

/// Resets the slot to `Idle` when the owning request unwinds, whether it
/// returned early, errored, or finished normally.
struct SlotGuard<'a> {
    state: &'a Mutex<CompletionState>,
    request_id: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap();
        if *state == CompletionState::Pending(self.request_id) {
            *state = CompletionState::Idle;
        }
    }
}

impl CompletionDispatcher {
    pub fn new(session: Arc<EditorSession>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            session,
            backend,
            state: Mutex::new(CompletionState::Idle),
            next_request_id: AtomicU64::new(0),
        }
    }

    /// Whether a request is currently in flight.
    pub fn is_pending(&self) -> bool {
        matches!(*self.state.lock().unwrap(), CompletionState::Pending(_))
    }

    /// Request a continuation of the session's document.
    ///
    /// Extracts the trailing prompt window, calls the provider, and splices
    /// the continuation into the document. Concurrent calls are collapsed:
    /// while one request is pending, further calls return
    /// [`CompletionOutcome::AlreadyPending`] without reaching the provider.
    pub async fn request_completion(&self) -> Result<CompletionOutcome> {
        let request_id = {
            let mut state = self.state.lock().unwrap();
            if let CompletionState::Pending(id) = *state {
                debug!(request_id = id, "Completion already in flight");
                return Ok(CompletionOutcome::AlreadyPending);
            }
            let id = self.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
            *state = CompletionState::Pending(id);
            id
        };
        let _slot = SlotGuard {
            state: &self.state,
            request_id,
        };

        let prompt = extract_prompt(&self.session.content())?;

        debug!(
            request_id,
            model = self.backend.model_name(),
            prompt_len = prompt.len(),
            "Dispatching completion request"
        );

        let completion = match self.backend.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(request_id, error = %e, "Completion request failed");
                return Err(e);
            }
        };

        if self.session.is_closed() {
            debug!(request_id, "Session closed; completion discarded");
            return Ok(CompletionOutcome::Discarded);
        }

        self.session.insert_text(&completion);
        info!(
            request_id,
            note_id = self.session.note_id(),
            chars = completion.len(),
            "Completion inserted"
        );
        Ok(CompletionOutcome::Inserted(completion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use quill_core::{Error, Note, NoteStore};
    use quill_db::MemoryNoteStore;
    use quill_inference::{MockCompletion, MockFailure};

    use crate::autosave::AutosaveClient;

    fn note(id: i64, content: &str) -> Note {
        Note {
            id,
            owner_id: "user_1".to_string(),
            name: "Draft".to_string(),
            content: content.to_string(),
            image_url: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn open_session(content: &str) -> Arc<EditorSession> {
        let store = Arc::new(MemoryNoteStore::new());
        store.seed(7, "user_1", "Draft", content);
        let autosave = Arc::new(AutosaveClient::new(store as Arc<dyn NoteStore>));
        EditorSession::open(autosave, &note(7, content))
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_requests_collapse_to_one_provider_call() {
        let session = open_session("<p>The story begins</p>");
        let mock = MockCompletion::new().with_latency_ms(200);
        let dispatcher = Arc::new(CompletionDispatcher::new(session, Arc::new(mock.clone())));

        let a = Arc::clone(&dispatcher);
        let b = Arc::clone(&dispatcher);
        let (first, second) = tokio::join!(a.request_completion(), b.request_completion());

        let outcomes = [first.unwrap(), second.unwrap()];
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, CompletionOutcome::Inserted(_))));
        assert!(outcomes.contains(&CompletionOutcome::AlreadyPending));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_document_is_rejected_before_the_provider() {
        let session = open_session("<h1></h1>");
        let mock = MockCompletion::new();
        let dispatcher = CompletionDispatcher::new(session, Arc::new(mock.clone()));

        match dispatcher.request_completion().await {
            Err(Error::InvalidInput(msg)) => assert_eq!(msg, "document is empty"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert_eq!(mock.call_count(), 0);
        // The validation failure must release the slot.
        assert!(!dispatcher.is_pending());
    }

    #[tokio::test]
    async fn prompt_is_the_trailing_word_window() {
        let words: Vec<String> = (1..=45).map(|i| format!("w{}", i)).collect();
        let session = open_session(&format!("<p>{}</p>", words.join(" ")));
        let mock = MockCompletion::new();
        let dispatcher = CompletionDispatcher::new(session, Arc::new(mock.clone()));

        dispatcher.request_completion().await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], words[15..].join(" "));
    }

    #[tokio::test]
    async fn provider_failure_does_not_wedge_the_session() {
        let session = open_session("<p>words here</p>");
        let failing = MockCompletion::new().with_failure(MockFailure::Quota);
        let dispatcher = CompletionDispatcher::new(session.clone(), Arc::new(failing));

        match dispatcher.request_completion().await {
            Err(Error::QuotaExceeded(_)) => {}
            other => panic!("expected QuotaExceeded, got {:?}", other),
        }
        assert!(!dispatcher.is_pending());

        // A fresh dispatcher state accepts the next request.
        let working = MockCompletion::new().with_fixed_response(" and then some.");
        let retry = CompletionDispatcher::new(session, Arc::new(working));
        match retry.request_completion().await.unwrap() {
            CompletionOutcome::Inserted(text) => assert_eq!(text, " and then some."),
            other => panic!("expected Inserted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn completion_splices_into_the_document() {
        let session = open_session("<p>Once upon a time</p>");
        let mock = MockCompletion::new().with_fixed_response(" there was a fox.");
        let dispatcher = CompletionDispatcher::new(session.clone(), Arc::new(mock));

        dispatcher.request_completion().await.unwrap();

        assert_eq!(session.content(), "<p>Once upon a time there was a fox.</p>");
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_session_discards_the_result() {
        let session = open_session("<p>soon to close</p>");
        let mock = MockCompletion::new().with_latency_ms(500);
        let dispatcher = Arc::new(CompletionDispatcher::new(
            session.clone(),
            Arc::new(mock.clone()),
        ));

        let d = Arc::clone(&dispatcher);
        let request = tokio::spawn(async move { d.request_completion().await });
        // Let the request reach the provider, then close mid-flight.
        tokio::task::yield_now().await;
        session.close();

        let outcome = request.await.unwrap().unwrap();
        assert_eq!(outcome, CompletionOutcome::Discarded);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(session.content(), "<p>soon to close</p>");
    }
}
