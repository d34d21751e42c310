//! Word bank loading.
//!
//! A word bank is a line-delimited text file with one candidate word per
//! line. Blank lines are ignored and surrounding whitespace is trimmed.

use std::path::{Path, PathBuf};

use crate::error::MorphError;

/// Default word bank file name.
pub const DEFAULT_WORD_BANK: &str = "wordbank.txt";

/// Read a word bank file, preserving line order and duplicates.
///
/// An empty result is not an error here; callers decide what zero words means.
pub fn load_word_bank(path: &Path) -> Result<Vec<String>, MorphError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| MorphError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    let words = parse_word_bank_str(&content);
    tracing::debug!("loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Split word bank text into trimmed, non-empty lines.
pub fn parse_word_bank_str(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve which word bank file to read.
///
/// Search order:
/// 1. an explicit path, if given
/// 2. `wordbank.txt` next to the running executable
/// 3. `wordbank.txt` relative to the current directory
pub fn resolve_word_bank_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_WORD_BANK)));
    match beside_exe {
        Some(path) if path.exists() => path,
        _ => PathBuf::from(DEFAULT_WORD_BANK),
    }
}
