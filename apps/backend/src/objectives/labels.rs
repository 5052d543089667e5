//! Objective pool parsing.
//!
//! Label files come from the classifier export: one label per line, optionally
//! prefixed by its class index (`"0 Arms Up"`).

use std::fs;
use std::path::Path;

/// Used when neither a labels file nor an explicit list is configured.
pub const DEFAULT_OBJECTIVES: &[&str] = &["Arms Up", "T Pose", "Squat", "Hands On Hips"];

pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(strip_index_prefix)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

pub fn load_labels(path: &Path) -> std::io::Result<Vec<String>> {
    fs::read_to_string(path).map(|contents| parse_labels(&contents))
}

/// Comma-separated list, blanks dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn default_pool() -> Vec<String> {
    DEFAULT_OBJECTIVES.iter().map(|s| s.to_string()).collect()
}

fn strip_index_prefix(line: &str) -> &str {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((index, rest)) if index.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => line,
    }
}
