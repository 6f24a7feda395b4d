//! Workspace discovery and layout
//!
//! A workspace is any directory holding a `.tsa/` folder with the project
//! store and an optional `config.yaml`.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::store::{JsonFileStore, STORE_FILE};

/// Name of the workspace metadata directory
pub const WORKSPACE_DIR: &str = ".tsa";

/// A discovered or freshly initialised workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory containing `.tsa/`
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current = std::env::current_dir().map_err(|e| WorkspaceError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace by walking up from `start`
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::Io(format!("{}: {}", start.display(), e)))?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                tracing::debug!(root = %current.display(), "workspace found");
                return Ok(Self { root: current });
            }
            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create `.tsa/` under `path`. With `force`, an existing workspace has
    /// its config rewritten; the project store is never overwritten.
    pub fn init(path: &Path, force: bool) -> Result<Self, WorkspaceError> {
        std::fs::create_dir_all(path).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let dir = root.join(WORKSPACE_DIR);
        if dir.exists() && !force {
            return Err(WorkspaceError::AlreadyExists(root));
        }
        std::fs::create_dir_all(&dir).map_err(|e| WorkspaceError::Io(e.to_string()))?;

        std::fs::write(dir.join("config.yaml"), Self::default_config())
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        let store = dir.join(STORE_FILE);
        if !store.exists() {
            std::fs::write(&store, "{}\n").map_err(|e| WorkspaceError::Io(e.to_string()))?;
        }

        tracing::info!(root = %root.display(), "workspace initialised");
        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Tunnel safety assessment workspace configuration

# Defaults for new projects (can be overridden by global config or TSA_* env vars)
# inspector: ""
# position: ""
# company: ""

# Construction type and span length used by `tsa section add`
# default_type: natm-rc
# unit_length: 20.0

# Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
# log_level: warn
"#
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.tsa/` directory
    pub fn tsa_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.tsa_dir().join("config.yaml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.tsa_dir().join(STORE_FILE)
    }

    /// The project store of this workspace
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.store_path())
    }
}

/// Errors locating or creating a workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a tsa workspace (searched from {searched_from:?}). Run 'tsa init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("tsa workspace already exists at {0:?} (use --force to reinitialise)")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::ProjectStore;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path(), false).unwrap();

        assert!(workspace.tsa_dir().is_dir());
        assert!(workspace.config_path().exists());
        assert!(workspace.store_path().exists());
        assert!(workspace.store().load_all().is_empty());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path(), false).unwrap();

        let err = Workspace::init(tmp.path(), false).unwrap_err();
        assert!(matches!(err, WorkspaceError::AlreadyExists(_)));
    }

    #[test]
    fn test_force_keeps_existing_store() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path(), false).unwrap();
        std::fs::write(workspace.store_path(), r#"{"P": {"name": "Kept"}}"#).unwrap();

        let workspace = Workspace::init(tmp.path(), true).unwrap();
        assert_eq!(workspace.store().load_all().len(), 1);
    }

    #[test]
    fn test_discover_from_nested_dir() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path(), false).unwrap();

        let nested = tmp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let workspace = Workspace::discover_from(&nested).unwrap();
        assert_eq!(workspace.root(), tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_fails_without_workspace() {
        let tmp = tempdir().unwrap();
        let err = Workspace::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound { .. }));
    }
}
