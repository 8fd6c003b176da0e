//! Line-oriented list files (circular-dependency allowlist, skip-list).

use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Comment marker for list files.
pub const COMMENT_PREFIX: char = '#';

/// Read a list file: one entry per line, blank and `#` lines ignored.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_list(path: &Path) -> Result<BTreeSet<String>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(e, path, "read list"))?;
    Ok(parse_list(&text))
}

/// Parse list text into its set of entries.
#[must_use]
pub fn parse_list(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(String::from)
        .collect()
}
