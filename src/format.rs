//! Human-readable records returned to clients, one per match.
use crate::search::TextMatch;
use crate::syntax::{StructuralMatch, truncate};
use std::path::Path;

/// Shows `file` relative to the searched root.
///
/// Paths outside the root, and the root itself, are shown in full.
pub fn display_path(file: &Path, root: &Path) -> String {
    match file.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => file.display().to_string(),
    }
}

/// `File: <path>, Line: <n>, Column: <n>`
pub fn format_text_match(m: &TextMatch, root: &Path) -> String {
    format!(
        "File: {}, Line: {}, Column: {}",
        display_path(&m.file, root),
        m.line,
        m.column
    )
}

pub fn format_structural_match(m: &StructuralMatch, root: &Path, node_text_limit: usize) -> String {
    let parent = m.parent.as_ref().map_or("none", |p| p.kind.as_str());
    let scope = match &m.scope {
        Some(s) => match &s.name {
            Some(name) => format!("{} ({name})", s.kind),
            None => s.kind.clone(),
        },
        None => "global".to_string(),
    };
    let sibling_count = m.siblings.as_ref().map_or(0, Vec::len);

    format!(
        "File: {file}\n\
         Node Type: {kind}\n\
         Line: {line}, Column: {column}\n\
         Node Text: {text}\n\
         Parent: {parent}\n\
         Scope: {scope}\n\
         Siblings: {sibling_count}, Children: {children}, Named Children: {named}\n\
         Start Position: {{ row: {sr}, column: {sc} }}, End Position: {{ row: {er}, column: {ec} }}\n\
         Context:\n  {before}\n> {current}\n  {after}",
        file = display_path(&m.file, root),
        kind = m.node_kind,
        line = m.start.row + 1,
        column = m.start.column + 1,
        text = truncate(&m.node_text, node_text_limit),
        children = m.child_count,
        named = m.named_child_count,
        sr = m.start.row,
        sc = m.start.column,
        er = m.end.row,
        ec = m.end.column,
        before = m.context.before,
        current = m.context.line,
        after = m.context.after,
    )
}
