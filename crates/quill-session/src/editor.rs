//! Editor state controller.
//!
//! One [`EditorSession`] is the single source of truth for a document's
//! content while it is being edited. Edits rearm a trailing-edge debounce
//! timer; when the quiet period elapses the latest content is handed to the
//! [`AutosaveClient`](crate::AutosaveClient). Rearming invalidates the
//! previous timer (superseded timers wake up, notice a newer epoch, and do
//! nothing).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use quill_core::{defaults, Note};

use crate::autosave::{AutosaveClient, SaveOutcome};

/// Session-scoped editor state with debounced autosave.
pub struct EditorSession {
    note_id: i64,
    debounce: Duration,
    autosave: Arc<AutosaveClient>,
    inner: Mutex<EditorInner>,
    closed: AtomicBool,
}

struct EditorInner {
    /// Current in-memory document markup.
    content: String,
    /// Bumped on every edit; a debounce timer only fires for its own epoch.
    epoch: u64,
    /// Last content known to match the stored copy.
    last_saved: Option<String>,
}

impl EditorSession {
    /// Open a session for a note with the default debounce interval.
    pub fn open(autosave: Arc<AutosaveClient>, note: &Note) -> Arc<Self> {
        Self::open_with_debounce(autosave, note, Duration::from_millis(defaults::DEBOUNCE_MS))
    }

    /// Open a session with a custom debounce interval.
    pub fn open_with_debounce(
        autosave: Arc<AutosaveClient>,
        note: &Note,
        debounce: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            note_id: note.id,
            debounce,
            autosave,
            inner: Mutex::new(EditorInner {
                content: note.initial_document(),
                epoch: 0,
                last_saved: Some(note.content.clone()),
            }),
            closed: AtomicBool::new(false),
        })
    }

    /// The note this session edits.
    pub fn note_id(&self) -> i64 {
        self.note_id
    }

    /// Current in-memory document markup.
    pub fn content(&self) -> String {
        self.inner.lock().unwrap().content.clone()
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close the session. Pending timers and in-flight completions resolve
    /// as no-ops; the in-memory content is discarded.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!(note_id = self.note_id, "Editor session closed");
    }

    /// Replace the in-memory content and (re)arm the debounce timer.
    ///
    /// An empty `new_content` is ignored: the editor emits one before it has
    /// initialized, and persisting it would wipe the note.
    pub fn on_content_changed(self: &Arc<Self>, new_content: &str) {
        if new_content.is_empty() || self.is_closed() {
            return;
        }

        let epoch = {
            let mut inner = self.inner.lock().unwrap();
            inner.content = new_content.to_string();
            inner.epoch += 1;
            inner.epoch
        };

        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(session.debounce).await;
            session.flush_epoch(epoch).await;
        });
    }

    /// Splice text at the cursor and re-enter the debounce path.
    ///
    /// The cursor model is end-of-document: text lands inside a trailing
    /// closing tag when one exists, so `"<p>Hello</p>"` + `" world"` yields
    /// `"<p>Hello world</p>"`.
    pub fn insert_text(self: &Arc<Self>, text: &str) {
        if text.is_empty() {
            return;
        }
        let updated = {
            let inner = self.inner.lock().unwrap();
            splice_at_end(&inner.content, text)
        };
        self.on_content_changed(&updated);
    }

    /// Save the session's content if `epoch` is still the latest edit.
    async fn flush_epoch(&self, epoch: u64) {
        let content = {
            let inner = self.inner.lock().unwrap();
            if inner.epoch != epoch {
                // A newer edit rearmed the timer; this one was cancelled.
                return;
            }
            if inner.last_saved.as_deref() == Some(inner.content.as_str()) {
                return;
            }
            inner.content.clone()
        };

        if self.is_closed() {
            return;
        }

        match self.autosave.save(self.note_id, &content).await {
            Ok(SaveOutcome::Written) | Ok(SaveOutcome::Unchanged) => {
                let mut inner = self.inner.lock().unwrap();
                inner.last_saved = Some(content);
            }
            Ok(SaveOutcome::Stale) => {
                debug!(note_id = self.note_id, "Debounced save superseded");
            }
            Err(e) => {
                // Content stays in memory; the next edit retriggers a save.
                warn!(note_id = self.note_id, error = %e, "Autosave failed");
            }
        }
    }
}

/// Insert `text` before a trailing closing tag, or append.
fn splice_at_end(content: &str, text: &str) -> String {
    if content.ends_with('>') {
        if let Some(idx) = content.rfind("</") {
            // Only treat it as the cursor position if the closing tag runs
            // to the end of the document.
            if content[idx + 1..].rfind('<').is_none() {
                let mut out = String::with_capacity(content.len() + text.len());
                out.push_str(&content[..idx]);
                out.push_str(text);
                out.push_str(&content[idx..]);
                return out;
            }
        }
    }
    let mut out = content.to_string();
    out.push_str(text);
    out
}
