//! Directory traversal and plain substring search.
//!
//! The structural scanner in [`crate::syntax`] shares the walker and the
//! error type defined here.
pub mod text;
pub mod walker;

use std::path::PathBuf;
use thiserror::Error;

pub use text::{LineHit, TextMatch, find_in_content, search_text};
pub use walker::{read_source, walk_files};

/// Errors that abort a search call.
///
/// No partial results are returned once any of these is raised.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search text must not be empty")]
    EmptyQuery,

    #[error("directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("failed to parse {path}")]
    ParseFailed { path: PathBuf },
}

/// Reject an empty search string before any file is touched.
pub(crate) fn ensure_query(needle: &str) -> Result<(), SearchError> {
    if needle.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(())
}
