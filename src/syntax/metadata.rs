//! Structural context for a matched node: parent, enclosing scope,
//! siblings and the surrounding source lines.
use super::languages::LanguageConfig;
use super::tree::{NodeId, SyntaxTree};
use crate::config::TruncationConfig;
use serde::Serialize;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentInfo {
    pub kind: String,
    pub text: String,
}

/// Nearest enclosing scope node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeInfo {
    pub kind: String,
    /// Text of the scope's `name` field, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiblingInfo {
    pub kind: String,
    pub text: String,
}

/// The line a match starts on, with its neighbours.
///
/// Neighbours outside the file are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineContext {
    pub before: String,
    pub line: String,
    pub after: String,
}

/// Keeps the first `max` characters of `text`, appending [`ELLIPSIS`] when
/// anything was cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Computes enrichment fields for nodes of a single parsed file.
pub struct MetadataExtractor<'a> {
    tree: &'a SyntaxTree,
    language: &'a LanguageConfig,
    limits: TruncationConfig,
    lines: Vec<&'a str>,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(tree: &'a SyntaxTree, language: &'a LanguageConfig, limits: TruncationConfig) -> Self {
        Self {
            tree,
            language,
            limits,
            lines: tree.source().split('\n').collect(),
        }
    }

    pub fn parent_info(&self, id: NodeId) -> Option<ParentInfo> {
        let parent = self.tree.node(id).parent?;
        Some(ParentInfo {
            kind: self.tree.node(parent).kind.to_string(),
            text: truncate(self.tree.text(parent), self.limits.parent_text),
        })
    }

    /// Nearest ancestor whose kind opens a scope; `None` means global scope.
    pub fn scope(&self, id: NodeId) -> Option<ScopeInfo> {
        let scope = self
            .tree
            .ancestors(id)
            .find(|&a| self.language.is_scope(self.tree.node(a).kind))?;

        Some(ScopeInfo {
            kind: self.tree.node(scope).kind.to_string(),
            name: self
                .tree
                .child_by_field(scope, "name")
                .map(|n| self.tree.text(n).to_string()),
        })
    }

    /// All other children of the parent, anonymous ones included.
    pub fn siblings(&self, id: NodeId) -> Option<Vec<SiblingInfo>> {
        let parent = self.tree.node(id).parent?;
        let siblings: Vec<SiblingInfo> = self
            .tree
            .node(parent)
            .children
            .iter()
            .copied()
            .filter(|&c| c != id)
            .map(|c| SiblingInfo {
                kind: self.tree.node(c).kind.to_string(),
                text: truncate(self.tree.text(c), self.limits.sibling_text),
            })
            .collect();

        if siblings.is_empty() {
            None
        } else {
            Some(siblings)
        }
    }

    pub fn context(&self, row: usize) -> LineContext {
        let line_at = |i: Option<usize>| {
            i.and_then(|i| self.lines.get(i))
                .map(|l| l.to_string())
                .unwrap_or_default()
        };
        LineContext {
            before: line_at(row.checked_sub(1)),
            line: line_at(Some(row)),
            after: line_at(row.checked_add(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tree::SourceParser;

    fn parse(source: &str) -> SyntaxTree {
        let mut parser = SourceParser::new(&LanguageConfig::javascript()).unwrap();
        parser.parse(source.to_string()).unwrap()
    }

    /// First node in pre-order with the given kind and text.
    fn find(tree: &SyntaxTree, kind: &str, text: &str) -> NodeId {
        let mut stack = vec![SyntaxTree::ROOT];
        while let Some(id) = stack.pop() {
            if tree.node(id).kind == kind && tree.text(id) == text {
                return id;
            }
            stack.extend(tree.node(id).children.iter().rev().copied());
        }
        panic!("no {kind} node with text {text:?}");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefghij...");
        assert_eq!(truncate("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_parent_and_siblings_of_identifier() {
        let tree = parse("function f(){ return x + 1; }");
        let lang = LanguageConfig::javascript();
        let ex = MetadataExtractor::new(&tree, &lang, TruncationConfig::default());
        let x = find(&tree, "identifier", "x");

        let parent = ex.parent_info(x).unwrap();
        assert_eq!(parent.kind, "binary_expression");
        assert_eq!(parent.text, "x + 1");

        let siblings = ex.siblings(x).unwrap();
        let kinds: Vec<&str> = siblings.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["+", "number"]);
        assert_eq!(siblings[1].text, "1");
    }

    #[test]
    fn test_nearest_scope_wins() {
        let source = "class A {\n  m() {\n    const g = () => y;\n  }\n}";
        let tree = parse(source);
        let lang = LanguageConfig::javascript();
        let ex = MetadataExtractor::new(&tree, &lang, TruncationConfig::default());

        let y = find(&tree, "identifier", "y");
        let scope = ex.scope(y).unwrap();
        assert_eq!(scope.kind, "arrow_function");
        assert_eq!(scope.name, None);

        let g = find(&tree, "identifier", "g");
        assert_eq!(ex.scope(g).unwrap().kind, "statement_block");

        let method = find(&tree, "property_identifier", "m");
        let scope = ex.scope(method).unwrap();
        assert_eq!(scope.kind, "method_definition");
        assert_eq!(scope.name.as_deref(), Some("m"));

        let class_name = find(&tree, "identifier", "A");
        let scope = ex.scope(class_name).unwrap();
        assert_eq!(scope.kind, "class_declaration");
        assert_eq!(scope.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_global_scope() {
        let tree = parse("let total = price * 2;");
        let lang = LanguageConfig::javascript();
        let ex = MetadataExtractor::new(&tree, &lang, TruncationConfig::default());
        let price = find(&tree, "identifier", "price");
        assert!(ex.scope(price).is_none());
    }

    #[test]
    fn test_root_has_no_parent_scope_or_siblings() {
        let tree = parse("x;");
        let lang = LanguageConfig::javascript();
        let ex = MetadataExtractor::new(&tree, &lang, TruncationConfig::default());
        assert!(ex.parent_info(SyntaxTree::ROOT).is_none());
        assert!(ex.scope(SyntaxTree::ROOT).is_none());
        assert!(ex.siblings(SyntaxTree::ROOT).is_none());
        assert_eq!(ex.context(0).line, "x;");
    }

    #[test]
    fn test_only_child_has_no_siblings() {
        let tree = parse("x;");
        let lang = LanguageConfig::javascript();
        let ex = MetadataExtractor::new(&tree, &lang, TruncationConfig::default());
        // program has a single child statement
        let stmt = find(&tree, "expression_statement", "x;");
        assert!(ex.siblings(stmt).is_none());
    }

    #[test]
    fn test_truncation_limits_apply() {
        let source = "call(aaaaaaaaaaaaaaaaaaaaaaaaa, b);";
        let tree = parse(source);
        let lang = LanguageConfig::javascript();
        let limits = TruncationConfig {
            parent_text: 5,
            sibling_text: 4,
            node_text: 100,
        };
        let ex = MetadataExtractor::new(&tree, &lang, limits);
        let b = find(&tree, "identifier", "b");

        assert_eq!(ex.parent_info(b).unwrap().text, "(aaaa...");
        let long = ex
            .siblings(b)
            .unwrap()
            .into_iter()
            .find(|s| s.kind == "identifier")
            .unwrap();
        assert_eq!(long.text, "aaaa...");
    }

    #[test]
    fn test_context_bounds() {
        let tree = parse("a;\nb;\nc;");
        let lang = LanguageConfig::javascript();
        let ex = MetadataExtractor::new(&tree, &lang, TruncationConfig::default());
        let lines = |row| {
            let c = ex.context(row);
            (c.before, c.line, c.after)
        };

        assert_eq!(lines(0), ("".into(), "a;".into(), "b;".into()));
        assert_eq!(lines(1), ("a;".into(), "b;".into(), "c;".into()));
        assert_eq!(lines(2), ("b;".into(), "c;".into(), "".into()));
        assert_eq!(lines(10), ("".into(), "".into(), "".into()));
    }
}
