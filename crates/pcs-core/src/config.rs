//! Pipeline run configuration parser (`pcs.toml`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub pid: PidConfig,
    pub storage: Option<StorageConfig>,
}

/// Run-shape knobs for the identity-matching stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidConfig {
    #[serde(default = "default_num_pid_containers")]
    pub num_pid_containers: usize,
    #[serde(default)]
    pub multikey_enabled: bool,
    #[serde(default)]
    pub use_row_numbers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for file-backed storage.
    pub root: PathBuf,
}

fn default_num_pid_containers() -> usize {
    1
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            num_pid_containers: default_num_pid_containers(),
            multikey_enabled: false,
            use_row_numbers: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
