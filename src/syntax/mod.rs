//! Syntax-aware search over JavaScript sources (Tree-sitter).
pub mod finder;
pub mod languages;
pub mod metadata;
pub mod tree;

pub use finder::{StructuralMatch, StructuralSearch, find_matching_nodes};
pub use languages::LanguageConfig;
pub use metadata::{LineContext, MetadataExtractor, ParentInfo, ScopeInfo, SiblingInfo, truncate};
pub use tree::{NodeId, Position, SourceParser, SyntaxNode, SyntaxTree};
