//! Prompt extraction from document markup.

use quill_core::{defaults, Error, Result};

/// Render document markup as plain text.
///
/// Tags become single spaces (so adjacent blocks stay separated as words)
/// and the handful of entities the editor emits are decoded. This is a word
/// source for prompt windows, not a faithful renderer.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;

    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Extract the trailing prompt window from document markup.
///
/// Splits the plain-text rendering on whitespace and takes the last
/// [`defaults::PROMPT_WORD_WINDOW`] words, rejoined with single spaces.
/// Fails with `InvalidInput` when the document has no words at all.
pub fn extract_prompt(markup: &str) -> Result<String> {
    let text = plain_text(markup);
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() {
        return Err(Error::InvalidInput("document is empty".to_string()));
    }

    let start = words.len().saturating_sub(defaults::PROMPT_WORD_WINDOW);
    Ok(words[start..].join(" "))
}
