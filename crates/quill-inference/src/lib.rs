//! # quill-inference
//!
//! Boundary wrapper around the external generative-text capability, plus the
//! cover-image keyword helpers used at notebook creation.
//!
//! [`GeminiBackend`] implements `quill_core::CompletionBackend` against the
//! Google Generative Language API; [`mock::MockCompletion`] is a call-logged
//! stand-in for tests.

pub mod gemini;
pub mod images;
pub mod mock;
pub mod normalize;

pub use gemini::GeminiBackend;
pub use mock::{MockCompletion, MockFailure};
pub use normalize::normalize_completion;
