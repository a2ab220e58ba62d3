use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes text pulled out of a table cell: non-breaking spaces become
/// ordinary spaces, whitespace runs collapse to one space, ends are trimmed.
pub fn clean(raw: &str) -> String {
    let spaced = raw.replace('\u{00A0}', " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}
