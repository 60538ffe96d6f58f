/// MCP Server setup using `rmcp` with stdio or streamable HTTP transport.
///
/// Provides `McpContext` (shared read-only state) and `McpServer` (startup logic).
use crate::config::{Config, Transport};
use crate::mcp::tools::AppTools;
use anyhow::{Context, Result};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{ServiceExt, handler::server::router::Router, transport::io::stdio};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Path the HTTP transport is mounted on.
pub const MCP_PATH: &str = "/mcp";

/// Shared application context available to all tool handlers.
#[derive(Clone)]
pub struct McpContext {
    pub config: Arc<Config>,
}

/// MCP Server wrapping the context.
#[derive(Clone)]
pub struct McpServer {
    pub ctx: McpContext,
}

impl McpServer {
    pub fn new(ctx: McpContext) -> Self {
        Self { ctx }
    }

    /// Handler router for a single session.
    fn session_router(ctx: McpContext) -> Router<AppTools> {
        let app_tools = AppTools::new(ctx);
        Router::new(app_tools.clone()).with_tools(app_tools.tool_router.clone())
    }

    /// Start the server on the configured transport.
    pub async fn start(self) -> Result<()> {
        match self.ctx.config.server.transport {
            Transport::Stdio => self.start_stdio().await,
            Transport::Http => {
                let addr = self.ctx.config.bind_addr()?;
                self.start_http(addr).await
            }
        }
    }

    /// Start the MCP server on stdio transport (blocks until the client disconnects).
    pub async fn start_stdio(self) -> Result<()> {
        info!("Starting MCP server on stdio...");
        let (stdin, stdout) = stdio();

        let running = Self::session_router(self.ctx.clone())
            .serve((stdin, stdout))
            .await
            .context("MCP Server failed to initialize on stdio transport")?;

        running
            .waiting()
            .await
            .context("MCP Server encountered an error during stdio transport")?;

        Ok(())
    }

    /// Serve streamable HTTP on `addr` until Ctrl-C.
    pub async fn start_http(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("Starting MCP server on http://{addr}{MCP_PATH}");

        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => trigger.cancel(),
                Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
            }
        });

        self.serve_http(listener, shutdown).await
    }

    /// Serve streamable HTTP on a bound listener until `shutdown` fires.
    ///
    /// Every MCP session gets its own handler built by the factory below.
    pub async fn serve_http(self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        let ctx = self.ctx.clone();
        let service = StreamableHttpService::new(
            move || Ok(Self::session_router(ctx.clone())),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig::default(),
        );

        let app = axum::Router::new().nest_service(MCP_PATH, service);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .context("MCP Server encountered an error during HTTP transport")?;

        info!("MCP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    const INITIALIZE: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"smoke","version":"0.0.0"}}}"#;

    /// Sends one `initialize` POST and returns the lower-cased raw response.
    async fn initialize(addr: SocketAddr) -> String {
        let request = format!(
            "POST {MCP_PATH} HTTP/1.1\r\n\
             Host: {addr}\r\n\
             Content-Type: application/json\r\n\
             Accept: application/json, text/event-stream\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{INITIALIZE}",
            INITIALIZE.len()
        );
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = Vec::new();
        let mut buf = [0u8; 4096];
        while !String::from_utf8_lossy(&response).contains("serverInfo") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            response.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&response).to_lowercase()
    }

    fn session_id(response: &str) -> Option<String> {
        response
            .lines()
            .find_map(|l| l.strip_prefix("mcp-session-id:"))
            .map(|v| v.trim().to_string())
    }

    #[tokio::test]
    async fn test_http_sessions_get_own_handler() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let server = McpServer::new(McpContext {
            config: Arc::new(Config::default()),
        });
        let handle = tokio::spawn(server.serve_http(listener, shutdown.clone()));

        let (first, second) = tokio::time::timeout(Duration::from_secs(10), async {
            (initialize(addr).await, initialize(addr).await)
        })
        .await
        .unwrap();

        for response in [&first, &second] {
            assert!(response.starts_with("http/1.1 200"), "{response}");
            assert!(response.contains("serverinfo"), "{response}");
        }
        let first_id = session_id(&first).unwrap();
        let second_id = session_id(&second).unwrap();
        assert!(!first_id.is_empty());
        assert_ne!(first_id, second_id);

        shutdown.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
}
