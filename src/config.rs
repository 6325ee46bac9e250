use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::report::ReportFormat;

/// Filename of the optional project configuration file.
pub const CONFIG_FILENAME: &str = ".sbfl.toml";

/// Fault localization configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SbflConfig {
    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of lines listed by `sbfl top`
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Output format
    #[serde(default)]
    pub format: ReportFormat,
}

fn default_top_n() -> usize {
    10
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            format: ReportFormat::default(),
        }
    }
}

impl SbflConfig {
    /// Load from `path`. Returns `Ok(None)` if the file does not exist, `Err` if malformed.
    pub fn load_optional(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(Some(config))
    }

    /// Load from `path`, falling back to defaults when absent.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::load_optional(path)?.unwrap_or_default())
    }
}
