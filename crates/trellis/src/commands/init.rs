//! Implementation of the `init` command.
//!
//! Creates the `.trellis/` directory with a configuration file and an
//! empty issue snapshot.

use crate::config::{
    TrellisConfig, CONFIG_FILE_NAME, DEFAULT_EPIC_LABEL, ISSUES_FILE_NAME, TRELLIS_DIR_NAME,
};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of the init command.
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created trellis directory.
    pub trellis_dir: PathBuf,
    /// Path to the created config file.
    pub config_file: PathBuf,
    /// Path to the created issue snapshot file.
    pub issues_file: PathBuf,
    /// The epic label written to the configuration.
    pub epic_label: String,
}

/// Initialize a trellis repository in the given directory.
///
/// # Errors
///
/// Returns [`Error::Config`] when the directory already contains a
/// `.trellis/` directory, and IO errors when scaffolding fails.
pub async fn init(root: &Path, epic_label: Option<&str>) -> Result<InitResult> {
    let trellis_dir = root.join(TRELLIS_DIR_NAME);
    if trellis_dir.exists() {
        return Err(Error::Config(format!(
            "{} already exists in {}",
            TRELLIS_DIR_NAME,
            root.display()
        )));
    }

    let epic_label = epic_label.unwrap_or(DEFAULT_EPIC_LABEL);
    fs::create_dir_all(&trellis_dir).await?;

    let config_file = trellis_dir.join(CONFIG_FILE_NAME);
    TrellisConfig::new(epic_label).save(&config_file).await?;

    let issues_file = trellis_dir.join(ISSUES_FILE_NAME);
    fs::write(&issues_file, "").await?;

    tracing::debug!(dir = %trellis_dir.display(), "initialized trellis repository");

    Ok(InitResult {
        trellis_dir,
        config_file,
        issues_file,
        epic_label: epic_label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_scaffolds_config_and_snapshot() {
        let dir = TempDir::new().unwrap();

        let result = init(dir.path(), None).await.unwrap();

        assert!(result.config_file.exists());
        assert!(result.issues_file.exists());
        assert_eq!(result.epic_label, DEFAULT_EPIC_LABEL);

        let config = TrellisConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config.epic_label, DEFAULT_EPIC_LABEL);
    }

    #[tokio::test]
    async fn init_accepts_a_custom_epic_label() {
        let dir = TempDir::new().unwrap();

        let result = init(dir.path(), Some("milestone")).await.unwrap();
        let config = TrellisConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config.epic_label, "milestone");
    }

    #[tokio::test]
    async fn init_refuses_to_reinitialize() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), None).await.unwrap();

        let err = init(dir.path(), None).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
