//! Cover-image keyword and URL helpers.
//!
//! Notebook covers come from a stock-photo service keyed on a single word
//! derived from the notebook name. Failures never propagate: an unusable
//! name degrades to the fallback keyword, and an unusable keyword degrades
//! to a deterministic colored placeholder.

use quill_core::defaults::FALLBACK_IMAGE_KEYWORD;

/// Placeholder background colors, indexed by keyword length.
const PLACEHOLDER_COLORS: [&str; 10] = [
    "6366f1", "8b5cf6", "ec4899", "f59e0b", "10b981", "3b82f6", "ef4444", "84cc16", "f97316",
    "06b6d4",
];

/// Derive a single search keyword from a notebook name.
///
/// Lowercases, drops everything but alphanumerics and spaces, and takes the
/// first word; an empty result falls back to `"notebook"`.
pub fn image_keyword(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_IMAGE_KEYWORD.to_string())
}

/// Build a stock-photo cover URL for the keyword.
///
/// A keyword with no usable characters degrades to the placeholder.
pub fn cover_image_url(keyword: &str) -> String {
    let clean: String = keyword
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if clean.is_empty() {
        return placeholder_image_url(keyword);
    }
    format!("https://source.unsplash.com/400x300/?{},notebook", clean)
}

/// Deterministic colored placeholder for a keyword.
pub fn placeholder_image_url(keyword: &str) -> String {
    let color = PLACEHOLDER_COLORS[keyword.len() % PLACEHOLDER_COLORS.len()];
    let text: String = keyword
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let text = if text.is_empty() {
        FALLBACK_IMAGE_KEYWORD.to_string()
    } else {
        text
    };
    format!(
        "https://via.placeholder.com/400x300/{}/ffffff?text={}",
        color, text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_takes_first_word_lowercased() {
        assert_eq!(image_keyword("My Trip! 2024"), "my");
        assert_eq!(image_keyword("Groceries"), "groceries");
    }

    #[test]
    fn keyword_falls_back_for_empty_or_symbolic_names() {
        assert_eq!(image_keyword(""), "notebook");
        assert_eq!(image_keyword("!!! ???"), "notebook");
    }

    #[test]
    fn cover_url_embeds_cleaned_keyword() {
        assert_eq!(
            cover_image_url("travel"),
            "https://source.unsplash.com/400x300/?travel,notebook"
        );
    }

    #[test]
    fn unusable_keyword_degrades_to_placeholder() {
        let url = cover_image_url("!!!");
        assert!(url.starts_with("https://via.placeholder.com/400x300/"));
        assert!(url.ends_with("text=notebook"));
    }

    #[test]
    fn placeholder_is_deterministic() {
        assert_eq!(placeholder_image_url("abc"), placeholder_image_url("abc"));
    }
}
