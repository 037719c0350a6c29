//! Configuration module for the `SoftEther` vpncmd admin client
//!
//! This module provides TOML-based configuration parsing and validation
//! for the library and the CLI driver.

use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server hostname or IP address
    pub address: String,
    /// Management port (usually 992)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Administrator password passed to vpncmd
    pub password: String,
    /// Hub name that scopes session and user operations.
    /// Server-wide operations (status, IPsec settings) do not require it.
    pub hub: Option<String>,
}

/// External tool invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path to the vpncmd binary
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Per-invocation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout: default_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// External tool settings
    #[serde(default)]
    pub tool: ToolConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AdminError::Config(format!("Failed to read config file: {e}")))?;

        <Self as FromStr>::from_str(&contents)
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AdminError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.address.is_empty() {
            return Err(AdminError::Config(
                "Server address cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AdminError::Config("Server port cannot be zero".to_string()));
        }

        if self.server.password.is_empty() {
            return Err(AdminError::Config(
                "Administrator password cannot be empty".to_string(),
            ));
        }

        if let Some(hub) = &self.server.hub {
            if hub.is_empty() {
                return Err(AdminError::Config(
                    "Hub name cannot be empty when set".to_string(),
                ));
            }
        }

        if self.tool.binary.is_empty() {
            return Err(AdminError::Config(
                "vpncmd binary path cannot be empty".to_string(),
            ));
        }

        if self.tool.timeout == 0 {
            return Err(AdminError::Config(
                "Tool timeout cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Management endpoint in the `address:port` form vpncmd expects
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

impl FromStr for Config {
    type Err = AdminError;

    fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AdminError::Config(format!("Failed to parse TOML: {e}")))
    }
}

// Default value functions for serde
fn default_port() -> u16 {
    992
}

fn default_binary() -> String {
    "vpncmd".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
