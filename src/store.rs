//! In-memory store of every kubeconfig in the configs directory.
//!
//! The store is built once at startup and never mutated afterwards, so it can
//! be shared between request handlers behind an `Arc` without locking.

use crate::error::LoadError;
use crate::kubeconfig::{KubeConfig, merge};
use std::collections::HashMap;
use std::fs::DirEntry;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A loaded document together with the file it came from.
#[derive(Debug, Clone)]
struct StoredConfig {
    path: PathBuf,
    config: KubeConfig,
}

/// Read-only index from config name to parsed document.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    dir: PathBuf,
    configs: HashMap<String, StoredConfig>,
}

impl ConfigStore {
    /// Load every document in `dir` and check that they merge together.
    ///
    /// This is the only way the server builds its store: either every file
    /// loads and the whole set is mergeable, or startup fails.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let store = Self::load(dir)?;
        store.validate_mergeable()?;
        Ok(store)
    }

    /// Load every document directly inside `dir`.
    ///
    /// Subdirectories and names starting with `..` (ConfigMap/Secret mount
    /// metadata) are skipped. The first unreadable or malformed file aborts
    /// the whole load.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        info!(configs_dir = ?dir, "Loading all configs");

        check_directory(dir)?;

        let entries = std::fs::read_dir(dir).map_err(|source| LoadError::ReadDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut configs: HashMap<String, StoredConfig> = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::ReadDirectory {
                path: dir.to_path_buf(),
                source,
            })?;

            let Some((name, path)) = config_entry(&entry) else {
                continue;
            };

            debug!(path = ?path, name = %name, "Loading config file");
            let config = KubeConfig::from_file(&path).map_err(|source| {
                LoadError::InvalidDocument {
                    path: path.clone(),
                    source,
                }
            })?;

            if let Some(existing) = configs.get(&name) {
                return Err(LoadError::DuplicateConfigName {
                    name,
                    first: existing.path.clone(),
                    second: path,
                });
            }

            debug!(name = %name, "Loaded config");
            configs.insert(name, StoredConfig { path, config });
        }

        info!(count = configs.len(), "Loaded all configs");
        Ok(Self {
            dir: dir.to_path_buf(),
            configs,
        })
    }

    /// Merge every stored document into an empty accumulator.
    ///
    /// Iteration follows the index, so the order across names is unspecified.
    /// Only the first failing merge is reported.
    pub fn validate_mergeable(&self) -> Result<(), LoadError> {
        if self.configs.is_empty() {
            warn!(configs_dir = ?self.dir, "No configs loaded, skipping merge validation");
            return Ok(());
        }

        info!("Validating that all configs can be merged together");
        let mut merged = KubeConfig::default();
        for (name, stored) in &self.configs {
            debug!(name = %name, "Merging config for validation");
            merged = merge(merged, &stored.config).map_err(|source| LoadError::Unmergeable {
                name: name.clone(),
                source,
            })?;
        }

        info!(
            clusters = merged.clusters.len(),
            "All configs can be merged together"
        );
        Ok(())
    }

    /// Every loaded config name, each exactly once, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }

    /// Config names sorted for display.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.list();
        names.sort();
        names
    }

    /// Look up a document by config name.
    pub fn get(&self, name: &str) -> Option<&KubeConfig> {
        self.configs.get(name).map(|stored| &stored.config)
    }

    /// File a config was loaded from.
    pub fn source_path(&self, name: &str) -> Option<&Path> {
        self.configs.get(name).map(|stored| stored.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Directory the store was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn check_directory(dir: &Path) -> Result<(), LoadError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(LoadError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LoadError::MissingDirectory(dir.to_path_buf()))
        }
        Err(source) => Err(LoadError::ReadDirectory {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Map a directory entry to `(config name, path)`, or `None` if it is skipped.
fn config_entry(entry: &DirEntry) -> Option<(String, PathBuf)> {
    let path = entry.path();
    let file_name = entry.file_name();
    let file_name = file_name.to_string_lossy();

    if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
        debug!(file = %file_name, "Skipping directory");
        return None;
    }

    if file_name.starts_with("..") {
        debug!(file = %file_name, "Skipping mount metadata entry");
        return None;
    }

    // Follows symlinks, which file_type() above does not.
    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => {
            debug!(file = %file_name, "Skipping directory");
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            debug!(file = %file_name, error = %e, "Skipping file due to stat error");
            return None;
        }
    }

    Some((config_name(&path)?, path))
}

/// Config name for a file: its name with the extension removed.
pub fn config_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}
