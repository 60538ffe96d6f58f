//! MCP server exposing the two search tools.
pub mod server;
pub mod tools;

pub use server::{McpContext, McpServer};
