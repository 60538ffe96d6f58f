use tree_sitter::Language;

/// Grammar plus the node kinds that open a scope in it.
#[derive(Clone)]
pub struct LanguageConfig {
    pub name: &'static str,
    pub language: Language,
    pub scope_kinds: &'static [&'static str],
}

impl LanguageConfig {
    pub fn javascript() -> Self {
        javascript_config()
    }

    pub fn is_scope(&self, kind: &str) -> bool {
        self.scope_kinds.contains(&kind)
    }
}

fn javascript_config() -> LanguageConfig {
    LanguageConfig {
        name: "javascript",
        language: tree_sitter_javascript::LANGUAGE.into(),
        scope_kinds: &[
            "function_declaration",
            "method_definition",
            "arrow_function",
            "class_declaration",
            "statement_block",
        ],
    }
}
