//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The configuration is
//! read once at startup and passed explicitly to everything that needs it.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Environment variable holding the allowed roots as a platform path list.
pub const FILE_ROOTS_ENV: &str = "MCP_FILE_ROOTS";

/// Roots used when `MCP_FILE_ROOTS` is not set, relative to the home directory.
pub const DEFAULT_ROOTS: &[&str] = &["~/Documents", "~/Downloads"];

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Path confinement configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for path confinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed root directories, as configured.
    ///
    /// Entries may be relative or start with `~`; they are resolved once
    /// when the `PathGuard` is built.
    pub allowed_roots: Vec<PathBuf>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl SecurityConfig {
    /// Parse a path list such as `"/data:/srv/shared"`.
    ///
    /// Uses the platform separator (`:` on Unix, `;` on Windows) and skips
    /// empty entries.
    pub fn from_path_list(list: &str) -> Self {
        Self {
            allowed_roots: std::env::split_paths(list)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "filesystem-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured. Variables are
    /// prefixed with `MCP_`, e.g. `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`,
    /// `MCP_FILE_ROOTS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        match std::env::var(FILE_ROOTS_ENV) {
            Ok(list) => {
                config.security = SecurityConfig::from_path_list(&list);
                info!("Allowed roots from {}: {:?}", FILE_ROOTS_ENV, list);
            }
            Err(_) => {
                info!("{} not set, using default roots {:?}", FILE_ROOTS_ENV, DEFAULT_ROOTS);
            }
        }

        config
    }
}
