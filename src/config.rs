//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting YAML configuration files with sensible defaults that can be
//! overridden from the command line.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::config::{StorageBackend, StorageConfig};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Errors raised while building the application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {} can't be read: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file {} is invalid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0}")]
    UnknownStorageType(String),

    #[error("No such as server mode: {0}")]
    UnknownMode(String),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Which front end the server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    Rest,
    Rpc,
}

impl Default for ServerMode {
    fn default() -> Self {
        ServerMode::Rest
    }
}

impl std::str::FromStr for ServerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(ServerMode::Rest),
            "rpc" | "grpc" => Ok(ServerMode::Rpc),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMode::Rest => f.write_str("rest"),
            ServerMode::Rpc => f.write_str("rpc"),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Port of the REST front end
    pub port: u16,
    /// Port of the RPC front end
    pub rpc_port: u16,
    /// Front end to serve
    pub mode: ServerMode,
    /// Number of worker threads
    pub workers: usize,
    /// Maximum photo size in bytes
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1213,
            rpc_port: 1323,
            mode: ServerMode::default(),
            workers: 4,
            max_payload_size: 20 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Port of the front end selected by `mode`
    pub fn listen_port(&self) -> u16 {
        match self.mode {
            ServerMode::Rest => self.port,
            ServerMode::Rpc => self.rpc_port,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Path to log4rs configuration file
    pub config_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            config_file: "photo_log.yaml".to_string(),
        }
    }
}

/// Command line flags, each overriding the matching configuration entry
#[derive(Debug, Default, Parser)]
#[command(name = "photo_shelf", about = "Photo storage server", version)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Port number
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Server mode [rest|rpc]
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// Storage type [file|leveldb|boltdb]
    #[arg(short = 't', long = "storage-type")]
    pub storage_type: Option<String>,

    /// Storage path
    #[arg(short = 's', long = "storage-path")]
    pub storage_path: Option<PathBuf>,
}

impl CliArgs {
    /// Apply the flags given on the command line on top of `config`
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(mode) = &self.mode {
            config.server.mode = mode.parse()?;
        }
        if let Some(port) = self.port {
            match config.server.mode {
                ServerMode::Rest => config.server.port = port,
                ServerMode::Rpc => config.server.rpc_port = port,
            }
        }
        if let Some(storage_type) = &self.storage_type {
            config.storage.backend = storage_type
                .parse::<StorageBackend>()
                .map_err(ConfigError::UnknownStorageType)?;
        }
        if let Some(path) = &self.storage_path {
            config.storage.path = path.clone();
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from file, use defaults if not found
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values the server can't start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == 0 {
            return Err(ConfigError::Invalid("server.workers must be at least 1"));
        }
        Ok(())
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Build the configuration from the file named on the command line (or the
    /// default file) and the remaining flags.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load(&path)?;
        args.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }
}
