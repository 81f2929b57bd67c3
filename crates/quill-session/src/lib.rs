//! # quill-session
//!
//! The editing-session engine: the state machine between a user's keystrokes
//! and durable storage, plus the guarded path to the generative-text
//! provider.
//!
//! - [`EditorSession`] owns the in-memory document and schedules
//!   trailing-edge debounced saves.
//! - [`AutosaveClient`] performs sequence-numbered compare-then-write
//!   synchronization against a `NoteStore`.
//! - [`CompletionDispatcher`] mediates AI continuation requests: at most one
//!   in flight per session, trailing-window prompt extraction, and insertion
//!   back into the document.
//!
//! One `EditorSession` exists per editing session; it is created when the
//! session opens and discarded after [`EditorSession::close`].

pub mod autosave;
pub mod completion;
pub mod editor;
pub mod prompt;

pub use autosave::{AutosaveClient, SaveOutcome};
pub use completion::{CompletionDispatcher, CompletionOutcome};
pub use editor::EditorSession;
pub use prompt::extract_prompt;
