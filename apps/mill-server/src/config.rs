//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MILL_DATABASE_PATH=/var/lib/mill/mill.db                           │
//! │     MILL_BIND_ADDR=0.0.0.0   MILL_PORT=8000                            │
//! │     MILL_LOG_LEVEL=debug     MILL_MAX_CONNECTIONS=8                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or mill.toml in the platform config dir:          │
//! │     ~/.config/mill-ledger/mill.toml (Linux)                            │
//! │     ~/Library/Application Support/com.mill.mill-ledger/mill.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! log_level = "info"
//!
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8000
//!
//! [database]
//! path = "./mill.db"
//! max_connections = 5
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use mill_db::DbConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from("./mill.db"),
            max_connections: 5,
        }
    }
}

// =============================================================================
// Server Config
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub server: HttpConfig,
    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            log_level: "info".to_string(),
            server: HttpConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_path` must exist; the platform default path is
    /// optional.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `MILL_*` overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup("MILL_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(addr) = lookup("MILL_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("MILL_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MILL_PORT",
                value: port.clone(),
            })?;
        }

        if let Some(level) = lookup("MILL_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(max) = lookup("MILL_MAX_CONNECTIONS") {
            self.database.max_connections =
                max.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MILL_MAX_CONNECTIONS",
                    value: max.clone(),
                })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path is required".into()));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "server.bind_addr",
                value: self.server.bind_addr.clone(),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mill", "mill-ledger")
            .map(|dirs| dirs.config_dir().join("mill.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
