//! Core types for quill.
//!
//! This crate holds everything the other layers share: the [`Note`] model,
//! the [`Error`] taxonomy, the [`NoteStore`] and [`CompletionBackend`]
//! traits, and default constants. It has no I/O of its own.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{CreateNoteRequest, Note};
pub use traits::{CompletionBackend, NoteStore};
