/// Configuration module for refscope.
///
/// Handles loading, validating, and providing default configuration values.
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Config file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "refscope.json";

// ── Default value functions ──────────────────────────────────────────

fn default_source_extension() -> String {
    "js".to_string()
}

fn default_parent_text() -> usize {
    50
}

fn default_sibling_text() -> usize {
    20
}

fn default_node_text() -> usize {
    100
}

fn default_transport() -> Transport {
    Transport::Stdio
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Extension (without the dot) of files parsed in structural mode.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default)]
    pub truncation: TruncationConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Character caps applied to node text in structural results.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TruncationConfig {
    #[serde(default = "default_parent_text")]
    pub parent_text: usize,

    #[serde(default = "default_sibling_text")]
    pub sibling_text: usize,

    #[serde(default = "default_node_text")]
    pub node_text: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_transport")]
    pub transport: Transport,

    /// Listen address for the HTTP transport.
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Stdio,
    Http,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            truncation: TruncationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            parent_text: default_parent_text(),
            sibling_text: default_sibling_text(),
            node_text: default_node_text(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            bind: default_bind(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to [`DEFAULT_CONFIG_PATH`].
    /// A missing file or invalid JSON yields the default config.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            DEFAULT_CONFIG_PATH
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let mut cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        // Accept ".js" as well as "js"
        if let Some(stripped) = cfg.source_extension.strip_prefix('.') {
            cfg.source_extension = stripped.to_string();
        }

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.source_extension.is_empty(),
            "source_extension must not be empty"
        );
        anyhow::ensure!(
            !self.source_extension.contains(['.', '/', '\\']),
            "source_extension must be a bare extension such as \"js\""
        );
        anyhow::ensure!(
            self.truncation.parent_text > 0,
            "truncation.parent_text must be positive"
        );
        anyhow::ensure!(
            self.truncation.sibling_text > 0,
            "truncation.sibling_text must be positive"
        );
        anyhow::ensure!(
            self.truncation.node_text > 0,
            "truncation.node_text must be positive"
        );
        self.bind_addr()?;
        Ok(())
    }

    /// Parsed HTTP listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("invalid server.bind address: {}", self.server.bind))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
