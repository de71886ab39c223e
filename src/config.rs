use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

use crate::protocol::constants::DEFAULT_DESCRIPTOR_SUFFIX;

pub const DEFAULT_CONFIG_FILE: &str = "huffpack.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub descriptor_suffix: String,
    pub embed_code_table: bool,
    pub verify_digest: bool,
    pub overwrite: bool,
    pub log_filter: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            descriptor_suffix: DEFAULT_DESCRIPTOR_SUFFIX.to_string(),
            embed_code_table: true,
            verify_digest: true,
            overwrite: false,
            log_filter: "huffpack=info".to_string(),
        }
    }
}

impl CodecConfig {
    /// An explicit path must exist; otherwise `huffpack.toml` is used when
    /// present and defaults apply when it is not.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(config_path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("reading config {}", config_path))?;
        let config: CodecConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", config_path))?;
        Ok(config)
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.descriptor_suffix.is_empty() {
            anyhow::bail!("descriptor_suffix must not be empty");
        }
        if self.descriptor_suffix.contains(['/', '\\']) {
            anyhow::bail!("descriptor_suffix must not contain path separators");
        }
        Ok(())
    }
}
