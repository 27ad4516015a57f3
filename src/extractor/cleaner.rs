use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Page chrome words are stripped as substrings, so "headers" becomes "s".
static CHROME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)menu|navigation|header|footer|sidebar").unwrap());

static PUNCTUATION_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]{2,}").unwrap());

static SPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Normalize extracted text before it is sent for analysis.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WHITESPACE_REGEX.replace_all(text, " ");
    let text = CHROME_REGEX.replace_all(&text, "");
    let text = PUNCTUATION_RUN_REGEX.replace_all(&text, ".");
    let text = SPACE_RUN_REGEX.replace_all(&text, " ");

    text.trim().to_string()
}
