use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::module_flags::ModuleFlags;
use crate::config::tool_paths::{Platform, ToolConfig};

/// Optional YAML configuration for a parsing run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParserConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modules: ModuleFlags,
    /// Replaces the platform tool table entirely when present
    #[serde(default)]
    pub tools: Option<ToolConfig>,
    /// Per-root cap on simultaneously running modules, unbounded when absent
    #[serde(default)]
    pub max_module_concurrency: Option<usize>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            version: default_version(),
            description: "Default Windows artifact parsing configuration".to_string(),
            modules: ModuleFlags::default(),
            tools: None,
            max_module_concurrency: None,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: ParserConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml).context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Tool table for this run: the configured override, or the platform default
    pub fn tool_config(&self, platform: Platform) -> ToolConfig {
        match &self.tools {
            Some(tools) => tools.clone(),
            None => ToolConfig::for_platform(platform),
        }
    }
}

/// Load the configuration file if one was given, otherwise use defaults.
///
/// Unlike pattern and target errors, a broken config file is reported as an
/// application error: the run never starts with a half-read configuration.
pub fn load_or_default(config_path: Option<&Path>) -> Result<ParserConfig> {
    match config_path {
        Some(path) => ParserConfig::from_yaml_file(path),
        None => {
            debug!("No config path provided, enabling every module");
            Ok(ParserConfig::default())
        }
    }
}
