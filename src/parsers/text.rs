use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));
static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("valid space pattern"));

/// Collapses three or more consecutive newlines into exactly two
pub fn collapse_newlines(text: &str) -> String {
    BLANK_LINE_RUNS.replace_all(text, "\n\n").into_owned()
}

/// Collapses two or more consecutive spaces into one
///
/// Only the space character is affected; tabs and newlines are left alone.
pub fn collapse_spaces(text: &str) -> String {
    SPACE_RUNS.replace_all(text, " ").into_owned()
}

/// Applies both collapsing rules, newlines first
pub fn collapse(text: &str) -> String {
    collapse_spaces(&collapse_newlines(text))
}

/// Normalizes whitespace within a single line or fragment
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes each line of a fragment and drops the blank ones
///
/// Line structure is kept, so explicit breaks survive.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(normalize_whitespace_in_segment)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns at most the first `max_chars` characters of `text`
///
/// Counts characters rather than bytes so a multi-byte character is never
/// split. Markup-like markers crossing the boundary are cut as-is.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
