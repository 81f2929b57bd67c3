//! Core traits for quill abstractions.
//!
//! These traits define the seams between the editing-session logic and its
//! external collaborators, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateNoteRequest, Note};

/// Keyed storage for notes.
///
/// The store enforces id uniqueness; implementations that can observe a
/// violation must surface it as an error rather than silently picking a row.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a new note, returning its assigned id.
    async fn create(&self, req: CreateNoteRequest) -> Result<i64>;

    /// Fetch a note by id. Fails with `Error::NoteNotFound` if absent.
    async fn fetch(&self, id: i64) -> Result<Note>;

    /// Overwrite the `content` field of one note. No other fields are
    /// touched (`updated_at` excepted).
    async fn update_content(&self, id: i64, content: &str) -> Result<()>;
}

/// Backend that turns a text prompt into a generated continuation.
///
/// Implementations own their request wrapping and response normalization;
/// callers receive text ready to splice after existing document text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate a continuation for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model name used for generation.
    fn model_name(&self) -> &str;
}
