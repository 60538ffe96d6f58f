use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use refscope::config::{Config, DEFAULT_CONFIG_PATH, Transport};
use refscope::format::{format_structural_match, format_text_match};
use refscope::mcp::{McpContext, McpServer};
use refscope::search::search_text;
use refscope::syntax::StructuralSearch;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "refscope", version, about = "Text and syntax-tree reference search")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (default)
    Serve {
        /// Transport to serve on (overrides the config file)
        #[arg(long, value_enum)]
        transport: Option<Transport>,
        /// Listen address for the HTTP transport
        #[arg(long)]
        bind: Option<String>,
    },
    /// Literal substring search in every file
    Text {
        text: String,
        directory: PathBuf,
        /// Print match records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Syntax-aware search in JavaScript files
    Tree {
        text: String,
        directory: PathBuf,
        /// Print match records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration to the config path
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr: stdout carries the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1. Load config
    let mut config = Config::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve {
        transport: None,
        bind: None,
    }) {
        Command::Serve { transport, bind } => {
            if let Some(transport) = transport {
                config.server.transport = transport;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate().context("invalid configuration")?;

            // 2. Start Server
            info!("Starting refscope MCP Server...");
            let ctx = McpContext {
                config: Arc::new(config),
            };
            McpServer::new(ctx).start().await?;
        }
        Command::Text {
            text,
            directory,
            json,
        } => {
            config.validate().context("invalid configuration")?;
            let matches = tokio::task::spawn_blocking({
                let directory = directory.clone();
                move || search_text(&directory, &text)
            })
            .await??;

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for m in &matches {
                    println!("{}", format_text_match(m, &directory));
                }
            }
        }
        Command::Tree {
            text,
            directory,
            json,
        } => {
            config.validate().context("invalid configuration")?;
            let search = StructuralSearch::from_config(&config);
            let node_text_limit = search.limits().node_text;
            let matches = tokio::task::spawn_blocking({
                let directory = directory.clone();
                move || search.search(&directory, &text)
            })
            .await??;

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for m in &matches {
                    println!("{}\n", format_structural_match(m, &directory, node_text_limit));
                }
            }
        }
        Command::InitConfig => {
            Config::default().save(&cli.config)?;
            info!("Wrote default configuration to {}", cli.config);
        }
    }

    Ok(())
}
