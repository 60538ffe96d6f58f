//! Structural search: every named node whose text contains the target.
use super::languages::LanguageConfig;
use super::metadata::{LineContext, MetadataExtractor, ParentInfo, ScopeInfo, SiblingInfo};
use super::tree::{NodeId, Position, SourceParser, SyntaxTree};
use crate::config::{Config, TruncationConfig};
use crate::search::{SearchError, ensure_query, read_source, walk_files};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A syntax node containing the search text, with its structural context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralMatch {
    pub file: PathBuf,
    pub node_text: String,
    pub node_kind: String,
    /// Columns count characters, matching text-mode columns.
    pub start: Position,
    pub end: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siblings: Option<Vec<SiblingInfo>>,
    pub child_count: usize,
    pub named_child_count: usize,
    pub is_named: bool,
    pub context: LineContext,
}

/// Named nodes whose text contains `needle`, in pre-order.
///
/// Each qualifying node is reported on its own, so a hit inside a nested
/// expression also yields every containing node.
pub fn find_matching_nodes(tree: &SyntaxTree, needle: &str) -> Vec<NodeId> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }

    let mut stack = vec![SyntaxTree::ROOT];
    while let Some(id) = stack.pop() {
        // A child's span lies inside its parent's, so a miss prunes the subtree.
        if !tree.text(id).contains(needle) {
            continue;
        }
        found.push(id);
        stack.extend(tree.named_children(id).rev());
    }
    found
}

/// Structural scanner over files with one source extension.
pub struct StructuralSearch {
    language: LanguageConfig,
    extension: String,
    limits: TruncationConfig,
}

impl StructuralSearch {
    pub fn new(extension: impl Into<String>, limits: TruncationConfig) -> Self {
        Self {
            language: LanguageConfig::javascript(),
            extension: extension.into(),
            limits,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.source_extension.clone(), config.truncation)
    }

    pub fn limits(&self) -> TruncationConfig {
        self.limits
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }

    /// Searches every source file under `root`; other files are skipped.
    pub fn search(&self, root: &Path, needle: &str) -> Result<Vec<StructuralMatch>, SearchError> {
        ensure_query(needle)?;

        let mut parser = SourceParser::new(&self.language)?;
        let mut matches = Vec::new();
        let mut scanned = 0usize;

        for file in walk_files(root)? {
            if !self.is_source_file(&file) {
                continue;
            }
            scanned += 1;
            let source = read_source(&file)?;
            matches.extend(self.search_source(&mut parser, &file, source, needle)?);
        }

        info!(
            "{} structural search for {needle:?} under {} scanned {scanned} .{} files, found {} matches",
            self.language.name,
            root.display(),
            self.extension,
            matches.len()
        );
        Ok(matches)
    }

    /// Parses one file's content and collects its matches.
    pub fn search_source(
        &self,
        parser: &mut SourceParser,
        file: &Path,
        source: String,
        needle: &str,
    ) -> Result<Vec<StructuralMatch>, SearchError> {
        let tree = parser.parse(source).ok_or_else(|| SearchError::ParseFailed {
            path: file.to_path_buf(),
        })?;

        let extractor = MetadataExtractor::new(&tree, &self.language, self.limits);
        let matches: Vec<StructuralMatch> = find_matching_nodes(&tree, needle)
            .into_iter()
            .map(|id| {
                let node = tree.node(id);
                let (start, end) = tree.char_span(id);
                StructuralMatch {
                    file: file.to_path_buf(),
                    node_text: tree.text(id).to_string(),
                    node_kind: node.kind.to_string(),
                    start,
                    end,
                    parent: extractor.parent_info(id),
                    scope: extractor.scope(id),
                    siblings: extractor.siblings(id),
                    child_count: tree.child_count(id),
                    named_child_count: tree.named_child_count(id),
                    is_named: node.is_named,
                    context: extractor.context(start.row),
                }
            })
            .collect();

        debug!("{}: {} nodes, {} matches", file.display(), tree.len(), matches.len());
        Ok(matches)
    }
}

impl Default for StructuralSearch {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
