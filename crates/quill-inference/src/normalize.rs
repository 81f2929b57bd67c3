//! Completion response normalization.
//!
//! Providers occasionally echo instructional boilerplate back at the start of
//! a continuation. Normalization strips the known prefixes and guarantees the
//! result splices cleanly after existing document text.

/// Boilerplate prefixes stripped (case-insensitively) from responses.
pub const BOILERPLATE_PREFIXES: [&str; 4] = [
    "Continue writing:",
    "Continuation:",
    "Here's the continuation:",
    "The text continues:",
];

/// Normalize a raw provider response for splicing into a document.
///
/// Trims surrounding whitespace, strips any recognized boilerplate prefix,
/// and enforces exactly one leading space so the caller can insert the text
/// directly after existing content. An empty result stays empty.
pub fn normalize_completion(raw: &str) -> String {
    let mut cleaned = raw.trim().to_string();

    for prefix in BOILERPLATE_PREFIXES {
        // get() rather than slicing: a multibyte char at the boundary must
        // not panic, it just means the prefix is not there.
        let matches = cleaned
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            cleaned = cleaned[prefix.len()..].trim().to_string();
        }
    }

    if cleaned.is_empty() {
        return cleaned;
    }
    format!(" {}", cleaned)
}
