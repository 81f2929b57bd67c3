//! Centralized default constants for quill.
//!
//! Single source of truth for shared default values; crates reference these
//! instead of defining their own magic numbers.

// =============================================================================
// AUTOSAVE
// =============================================================================

/// Quiet period before a pending edit becomes a durable write.
pub const DEBOUNCE_MS: u64 = 500;

// =============================================================================
// COMPLETION
// =============================================================================

/// Trailing word window submitted as the completion prompt.
pub const PROMPT_WORD_WINDOW: usize = 30;

/// Default Gemini generation model.
pub const GEN_MODEL: &str = "gemini-pro";

/// Default Gemini API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// COVER IMAGES
// =============================================================================

/// Keyword used when a notebook name yields nothing usable.
pub const FALLBACK_IMAGE_KEYWORD: &str = "notebook";
