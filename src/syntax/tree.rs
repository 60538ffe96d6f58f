//! Arena copy of a tree-sitter parse tree.
//!
//! Every node of the parse is copied into a flat `Vec` and addressed by
//! [`NodeId`]. Parent and child links are indices into that vector, so the
//! tree owns its nodes exactly once and lookups never borrow from the
//! underlying `tree_sitter::Tree`.
use super::languages::LanguageConfig;
use crate::search::SearchError;
use serde::Serialize;
use std::ops::Range;
use tree_sitter::{Parser, Point, Tree};

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// 0-based row and column.
///
/// Nodes carry the parser's byte columns; [`SyntaxTree::char_span`] gives
/// character columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: &'static str,
    pub is_named: bool,
    /// Field name under the parent, e.g. `name` or `body`.
    pub field: Option<&'static str>,
    pub byte_range: Range<usize>,
    pub start: Position,
    pub end: Position,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

pub struct SyntaxTree {
    source: String,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub const ROOT: NodeId = NodeId(0);

    /// Copies `tree` into an arena, in pre-order, without recursion.
    pub fn from_tree(tree: &Tree, source: String) -> Self {
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        let mut ancestors: Vec<NodeId> = Vec::new();
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            let id = NodeId(nodes.len());
            let parent = ancestors.last().copied();
            nodes.push(SyntaxNode {
                kind: node.kind(),
                is_named: node.is_named(),
                field: cursor.field_name(),
                byte_range: node.byte_range(),
                start: node.start_position().into(),
                end: node.end_position().into(),
                parent,
                children: Vec::new(),
            });
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }

            if cursor.goto_first_child() {
                ancestors.push(id);
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Self { source, nodes };
                }
                ancestors.pop();
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes; never zero, the root is always present.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    /// Source text spanned by a node.
    pub fn text(&self, id: NodeId) -> &str {
        self.source
            .get(self.node(id).byte_range.clone())
            .unwrap_or_default()
    }

    pub fn named_children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&c| self.node(c).is_named)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).children.len()
    }

    pub fn named_child_count(&self, id: NodeId) -> usize {
        self.named_children(id).count()
    }

    /// First child stored under the given field name.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).field == Some(field))
    }

    /// Start and end of a node with columns counted in characters.
    pub fn char_span(&self, id: NodeId) -> (Position, Position) {
        let node = self.node(id);
        (
            self.char_position(node.byte_range.start, node.start),
            self.char_position(node.byte_range.end, node.end),
        )
    }

    /// Re-counts `point.column` (bytes from line start) as characters.
    fn char_position(&self, byte: usize, point: Position) -> Position {
        let line_start = byte.saturating_sub(point.column);
        let column = self
            .source
            .get(line_start..byte)
            .map_or(point.column, |prefix| prefix.chars().count());
        Position {
            row: point.row,
            column,
        }
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |&p| self.node(p).parent)
    }
}

/// Parser for one search call.
///
/// The grammar is shared read-only; each call owns its own
/// `tree_sitter::Parser`, and each file gets a fresh tree.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new(config: &LanguageConfig) -> Result<Self, SearchError> {
        let mut parser = Parser::new();
        parser.set_language(&config.language)?;
        Ok(Self { parser })
    }

    /// Parses `source`; `None` when the parser gives up.
    pub fn parse(&mut self, source: String) -> Option<SyntaxTree> {
        let tree = self.parser.parse(&source, None)?;
        Some(SyntaxTree::from_tree(&tree, source))
    }
}
