use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements that get a boundary space on each side when an article is
/// flattened to text, so that words in adjacent blocks do not glue together.
pub static BLOCK_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from(["p", "div", "h1", "h2", "h3", "h4", "h5", "h6"])
});

static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A run of non-terminators followed by a run of `.`, `!` or `?`.
pub static WESTERN_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

/// Like [`WESTERN_SENTENCE`], also ending on the full-width `。`, `！` and `？`.
pub static FULL_WIDTH_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?。！？]+[.!?。！？]+").unwrap());

/// Collapse every run of whitespace in `src` into a single ASCII space and
/// trim both ends.
pub fn collapse_whitespace(src: &str) -> String {
    WHITESPACE_RUNS.replace_all(src, " ").trim().to_string()
}

/// Remove all whitespace.  Used to compare texts "modulo whitespace".
#[cfg(test)]
pub fn strip_whitespace(src: &str) -> String {
    src.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Length in Unicode scalar values.  All pipeline lengths and offsets use
/// this unit.
pub fn char_len(src: &str) -> usize {
    src.chars().count()
}

pub fn is_blank(src: &str) -> bool {
    src.trim().is_empty()
}
