pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

pub use html::normalize;

use crate::results::NormalizedText;

/// Normalizes markup and bounds the body to `max_chars` characters
///
/// The bound is applied after normalization so markers are produced from
/// the whole document before anything is cut.
pub fn normalize_bounded(markup: &str, max_chars: usize) -> NormalizedText {
    bound(normalize(markup), max_chars)
}

/// Cuts an already normalized body to `max_chars` characters
pub fn bound(mut normalized: NormalizedText, max_chars: usize) -> NormalizedText {
    let original_len = normalized.body.chars().count();
    if original_len > max_chars {
        normalized.body = text::truncate_chars(&normalized.body, max_chars).to_string();
        ::log::debug!(
            "Truncated normalized text of '{}' from {} to {} chars",
            normalized.title,
            original_len,
            max_chars
        );
    }
    normalized
}
