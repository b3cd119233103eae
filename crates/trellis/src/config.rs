//! Configuration management for trellis.
//!
//! A trellis repository is a `.trellis/` directory holding a YAML
//! configuration file and the issue snapshot. Discovery walks up from the
//! working directory, so commands work from anywhere inside the tree.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the trellis directory.
pub const TRELLIS_DIR_NAME: &str = ".trellis";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the issue snapshot file.
pub const ISSUES_FILE_NAME: &str = "issues.jsonl";

/// Label that marks an issue as an epic unless configured otherwise.
pub const DEFAULT_EPIC_LABEL: &str = "epic";

/// Maximum directory depth to traverse when searching for the trellis root.
const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for trellis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrellisConfig {
    /// Label treated as the epic marker.
    #[serde(rename = "epic-label")]
    pub epic_label: String,

    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Path to the snapshot file, relative to the repository root.
    #[serde(rename = "data-file")]
    pub data_file: String,
}

impl TrellisConfig {
    /// Create a new configuration with the given epic label.
    #[must_use]
    pub fn new(epic_label: &str) -> Self {
        Self {
            epic_label: epic_label.to_string(),
            storage: StorageConfig {
                data_file: format!("{TRELLIS_DIR_NAME}/{ISSUES_FILE_NAME}"),
            },
        }
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is unreadable or not valid YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for TrellisConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EPIC_LABEL)
    }
}

/// Finds the repository root by walking up until a `.trellis/` directory
/// appears. Returns `None` when no ancestor contains one.
#[must_use]
pub fn find_trellis_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    for _ in 0..MAX_TRAVERSAL_DEPTH {
        if current.join(TRELLIS_DIR_NAME).is_dir() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
    None
}
