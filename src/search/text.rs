use super::{SearchError, ensure_query, read_source, walk_files};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One literal occurrence of the search text in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMatch {
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// 1-based character offset of the first matched character.
    pub column: usize,
}

/// Position of an occurrence inside a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHit {
    pub line: usize,
    pub column: usize,
}

/// Finds every occurrence of `needle` in `content`, line by line.
///
/// Lines are split on `\n` only, so a trailing `\r` counts as a column.
/// After each hit the scan resumes one character past the hit's start, which
/// reports overlapping occurrences. An empty `needle` matches nothing.
pub fn find_in_content(content: &str, needle: &str) -> Vec<LineHit> {
    let mut hits = Vec::new();
    if needle.is_empty() {
        return hits;
    }

    for (idx, line) in content.split('\n').enumerate() {
        let mut from = 0;
        while let Some(offset) = line[from..].find(needle) {
            let start = from + offset;
            hits.push(LineHit {
                line: idx + 1,
                column: line[..start].chars().count() + 1,
            });
            from = start + line[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    hits
}

/// Plain-mode search: every file under `root`, any file type.
pub fn search_text(root: &Path, needle: &str) -> Result<Vec<TextMatch>, SearchError> {
    ensure_query(needle)?;

    let mut matches = Vec::new();
    for file in walk_files(root)? {
        let content = read_source(&file)?;
        matches.extend(
            find_in_content(&content, needle)
                .into_iter()
                .map(|hit| TextMatch {
                    file: file.clone(),
                    line: hit.line,
                    column: hit.column,
                }),
        );
    }

    info!(
        "text search for {needle:?} under {} found {} matches",
        root.display(),
        matches.len()
    );
    Ok(matches)
}
