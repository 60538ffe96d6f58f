/// MCP Tool handlers for refscope.
///
/// Implements 2 tools:
/// 1. get-text-matches – literal substring hits with line/column
/// 2. get-parse-tree   – syntax-tree hits with structural context
use crate::format::{format_structural_match, format_text_match};
use crate::mcp::server::McpContext;
use crate::search::{SearchError, search_text};
use crate::syntax::StructuralSearch;
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{ErrorData as McpError, handler::server::tool::ToolRouter, model::*, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;

// ── Parameter structs ────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct SearchParams {
    /// Exact text to look for (case-sensitive, must not be empty)
    text: String,
    /// Absolute path of the directory to search
    directory: String,
}

// ── Response helpers ─────────────────────────────────────────────────

/// One text content item per record.
fn records_result(records: Vec<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(
        records.into_iter().map(Content::text).collect(),
    ))
}

pub(crate) fn search_error(e: SearchError) -> McpError {
    match e {
        SearchError::EmptyQuery => McpError::invalid_params(e.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

/// Runs a blocking search off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, McpError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SearchError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| McpError::internal_error(format!("search task failed: {e}"), None))?
        .map_err(search_error)
}

// ── Tool implementations ─────────────────────────────────────────────

/// Handler object for one MCP session.
#[derive(Clone)]
pub struct AppTools {
    pub ctx: McpContext,
    pub tool_router: ToolRouter<Self>,
}

impl ServerHandler for AppTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Find references to a string in a directory: get-text-matches for plain \
                 line/column hits, get-parse-tree for syntax-aware hits in JavaScript files."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tool_router]
impl AppTools {
    pub fn new(ctx: McpContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tool 1: get-text-matches ────────────────────────────────────

    #[tool(name = "get-text-matches", description = "Get references to text")]
    async fn get_text_matches(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let SearchParams { text, directory } = params.0;
        let root = PathBuf::from(&directory);

        let matches = {
            let root = root.clone();
            run_blocking(move || search_text(&root, &text)).await?
        };

        records_result(
            matches
                .iter()
                .map(|m| format_text_match(m, &root))
                .collect(),
        )
    }

    // ── Tool 2: get-parse-tree ──────────────────────────────────────

    #[tool(
        name = "get-parse-tree",
        description = "Get a parse tree to find reference. Reports every JavaScript syntax node containing the text, with parent, scope, siblings and surrounding lines."
    )]
    async fn get_parse_tree(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let SearchParams { text, directory } = params.0;
        let root = PathBuf::from(&directory);
        let search = StructuralSearch::from_config(&self.ctx.config);
        let node_text_limit = search.limits().node_text;

        let matches = {
            let root = root.clone();
            run_blocking(move || search.search(&root, &text)).await?
        };

        records_result(
            matches
                .iter()
                .map(|m| format_structural_match(m, &root, node_text_limit))
                .collect(),
        )
    }
}
