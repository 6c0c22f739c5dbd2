use regex::Regex;
use std::sync::LazyLock;

static RATING_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*rating\s*:\s*").expect("valid rating label pattern"));

/// Strips a leading `Rating:` label from a model answer
///
/// The remainder is kept verbatim, so answers like `no data` survive as-is.
pub fn parse_rating(response: &str) -> String {
    RATING_LABEL
        .replace(response.trim(), "")
        .trim()
        .to_string()
}

/// Rewrites a model answer into `* ` bullet lines
///
/// Answers already starting with `*` pass through trimmed. Otherwise every
/// non-blank line loses its leading dashes and spaces and gets a `* ` prefix.
/// Answers that merely mention "no" and "found" are not special-cased.
pub fn parse_bullets(response: &str) -> String {
    let trimmed = response.trim();
    if trimmed.starts_with('*') {
        return trimmed.to_string();
    }

    trimmed
        .lines()
        .map(|line| line.trim_start_matches(['-', ' ', '\t']).trim_end())
        .filter(|line| !line.is_empty())
        .map(|line| format!("* {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
