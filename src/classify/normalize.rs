//! Field normalization for identifier and status cells
//!
//! Spreadsheet exports leave invisible characters (non-breaking spaces,
//! zero-width joiners, stray control codes) inside identifiers. Everything
//! outside printable ASCII is removed so joins and display keys compare
//! cleanly. Numeric and date cells never pass through here.

use regex::Regex;
use std::sync::LazyLock;

static NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E]+").expect("static pattern is valid"));

/// Trim and strip non-printable characters; absent input becomes empty
pub fn normalize(raw: Option<&str>) -> String {
    match raw {
        Some(value) => NON_PRINTABLE.replace_all(value.trim(), "").trim().to_string(),
        None => String::new(),
    }
}

/// Header names only lose surrounding whitespace
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_string()
}
