//! # refscope: Reference Search MCP Server
//!
//! Finds every occurrence of a string under a directory and reports it either
//! as plain line/column hits or as syntax-tree hits enriched with structural
//! context, served to AI assistants via the Model Context Protocol (MCP).
//!
//! ## Architecture
//!
//! - **[`config`]** - Configuration loading and validation
//! - **[`search`]** - Directory walk and literal substring search
//! - **[`syntax`]** - Tree-sitter parsing into a node arena, match finding, metadata extraction
//! - **[`format`]** - Text records returned to clients
//! - **[`mcp`]** - MCP server with 2 tool handlers (stdio or streamable HTTP via rmcp)

pub mod config;
pub mod format;
pub mod mcp;
pub mod search;
pub mod syntax;
