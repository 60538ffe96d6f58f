use super::SearchError;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collects every regular file under `root`, at any depth.
///
/// No ignore files are honoured, hidden entries are included and symlinks
/// are not followed. Files come back in directory listing order. The first
/// error aborts the whole walk.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>, SearchError> {
    // The walker reports a missing root lazily; fail up front instead.
    fs::metadata(root).map_err(|source| SearchError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            files.push(entry.into_path());
        }
    }

    debug!("walked {} files under {}", files.len(), root.display());
    Ok(files)
}

/// Reads a file as text, replacing invalid UTF-8 with U+FFFD.
pub fn read_source(path: &Path) -> Result<String, SearchError> {
    let bytes = fs::read(path).map_err(|source| SearchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
