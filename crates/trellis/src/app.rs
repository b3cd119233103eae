//! Application context tying configuration, the collection, and the
//! persisted snapshot together.
//!
//! `App` is what the transport layer talks to: it loads a repository,
//! exposes the one synchronous "resolve and render, optionally filtered"
//! operation, and persists resolved state. It owns no network concern.

use crate::collection::IssueCollection;
use crate::config::{find_trellis_root, TrellisConfig, CONFIG_FILE_NAME, TRELLIS_DIR_NAME};
use crate::domain::Issue;
use crate::error::{Error, Result};
use crate::render::render_collection;
use std::path::{Path, PathBuf};

/// Visibility filters for a rendered view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Hide closed issues.
    pub hide_closed: bool,
    /// Hide orphan and epic-unlinked issues.
    pub hide_orphans: bool,
}

/// Application context for one trellis repository.
pub struct App {
    config: TrellisConfig,
    collection: IssueCollection,
    data_path: PathBuf,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("data_path", &self.data_path)
            .field("issues", &self.collection.len())
            .finish()
    }
}

impl App {
    /// Creates an App from the given working directory.
    ///
    /// Searches up the directory tree for a `.trellis/` directory, loads
    /// configuration, and loads the issue snapshot when one exists. Load
    /// warnings (malformed snapshot lines) are logged and the affected
    /// records skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when no trellis repository is found or the
    /// configuration cannot be loaded.
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root = find_trellis_root(working_dir).ok_or_else(|| {
            Error::Config(format!(
                "Not a trellis repository (no {TRELLIS_DIR_NAME} directory found)"
            ))
        })?;

        let config_path = root.join(TRELLIS_DIR_NAME).join(CONFIG_FILE_NAME);
        let config = TrellisConfig::load(&config_path).await?;
        let data_path = root.join(&config.storage.data_file);

        let collection = if data_path.exists() {
            let (issues, warnings) =
                trellis_jsonl::read_jsonl_resilient::<Issue>(&data_path).await?;
            for warning in &warnings {
                tracing::warn!(warning = %warning, "snapshot load warning");
            }
            IssueCollection::from_snapshot(issues)
        } else {
            IssueCollection::new()
        };

        Ok(Self {
            config,
            collection,
            data_path,
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &TrellisConfig {
        &self.config
    }

    /// The loaded collection.
    #[must_use]
    pub fn collection(&self) -> &IssueCollection {
        &self.collection
    }

    /// Mutable access to the collection, for merging fetch batches.
    pub fn collection_mut(&mut self) -> &mut IssueCollection {
        &mut self.collection
    }

    /// Resolves the loaded collection in place.
    pub fn resolve(&mut self) {
        self.collection.resolve(&self.config.epic_label);
    }

    /// Resolves and renders the current collection with the given filters.
    ///
    /// Works on a clone: the loaded collection is never mutated by a
    /// render, so a failed or filtered view cannot corrupt it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] on structural diagram errors.
    pub fn resolve_and_render(&self, options: RenderOptions) -> Result<String> {
        let mut view = self.collection.clone();
        view.resolve(&self.config.epic_label);
        if options.hide_closed {
            view.hide_closed();
        }
        if options.hide_orphans {
            view.hide_orphans();
        }
        render_collection(&view, &self.config.epic_label)
    }

    /// Persists the collection snapshot atomically.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the snapshot cannot be written.
    pub async fn save(&self) -> Result<()> {
        trellis_jsonl::write_jsonl_atomic(&self.data_path, &self.collection.snapshot()).await?;
        Ok(())
    }
}
