//! Typed configuration structures and YAML parsing.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::fabric::Fabric;

/// Top-level configuration that mirrors the YAML configuration file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Fabric sizing
    pub fabric: FabricConfig,
    /// Controller endpoint advertised in the emulator descriptor
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// Fabric sizing section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Ports per switch; must be even
    pub k: u16,
}

/// Controller endpoint the emulated switches connect to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_controller_address")]
    pub address: String,
    #[serde(default = "default_controller_port")]
    pub port: u16,
}

fn default_controller_address() -> String {
    "127.0.0.1".to_string()
}

fn default_controller_port() -> u16 {
    6633
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            address: default_controller_address(),
            port: default_controller_port(),
        }
    }
}

impl Config {
    /// Build a configuration from a bare `k`, with defaults elsewhere.
    pub fn for_k(k: u16) -> Self {
        Config {
            fabric: FabricConfig { k },
            controller: ControllerConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        Fabric::new(self.fabric.k)
            .map_err(|e| ValidationError::InvalidFabric(e.to_string()))?;

        if self.controller.address.is_empty() {
            return Err(ValidationError::InvalidController(
                "controller address cannot be empty".to_string(),
            ));
        }
        if self.controller.port == 0 {
            return Err(ValidationError::InvalidController(
                "controller port cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid fabric configuration: {0}")]
    InvalidFabric(String),
    #[error("Invalid controller configuration: {0}")]
    InvalidController(String),
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> color_eyre::eyre::Result<Config> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read configuration file '{}'", path.display()))?;
    let config: Config = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", path.display()))?;
    config
        .validate()
        .wrap_err_with(|| format!("Invalid configuration in '{}'", path.display()))?;
    Ok(config)
}
