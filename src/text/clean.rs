//! Item text normalization
//!
//! Applied before any comparison or storage, so two spellings of the same
//! list item ("- **coffee**", "coffee") compare equal.

use regex::Regex;
use std::sync::LazyLock;

/// Leading bullet (`-`, `*`, `+`, `•`) or ordinal (`1.`, `2)`), with an
/// optional task checkbox after it.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+•]|\d+[.)])(?:\s+(?:\[[ xX]\]\s*)?|$)").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a raw fragment into an item label.
///
/// Strips emphasis markup, list markers, trailing sentence punctuation and
/// surrounding whitespace, and collapses internal whitespace. Idempotent:
/// `clean_item(&clean_item(s)) == clean_item(s)`.
pub fn clean_item(text: &str) -> String {
    let mut current = clean_pass(text);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    let mut s = text.replace("**", "").replace("__", "");
    s = WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned();
    s = LIST_MARKER.replace(&s, "").into_owned();
    s = strip_wrapper(&s, '*');
    s = strip_wrapper(&s, '_');
    s.trim()
        .trim_end_matches(['.', ',', ';', '!'])
        .trim()
        .to_string()
}

/// Remove a single-character emphasis wrapper around the whole text.
fn strip_wrapper(text: &str, marker: char) -> String {
    if text.len() >= 2 && text.starts_with(marker) && text.ends_with(marker) {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}
