//! Project persistence
//!
//! A flat record store with load-all / save-all semantics. Loading never
//! fails: a missing or corrupt store reads as an empty collection, and a
//! single bad record is skipped without losing the others. Whenever data
//! is dropped on load, the file is first moved aside to
//! `projects.json.corrupt-<timestamp>` so the next save cannot destroy it.

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::ProjectId;
use crate::entities::Project;

/// All projects, keyed by id
pub type ProjectMap = BTreeMap<ProjectId, Project>;

/// File name of the JSON store inside the workspace directory
pub const STORE_FILE: &str = "projects.json";

/// Durable storage for the whole project collection
pub trait ProjectStore {
    /// Load every project. Never fails; unreadable data reads as empty.
    fn load_all(&self) -> ProjectMap;

    /// Overwrite the store with `projects`
    fn save_all(&self, projects: &ProjectMap) -> Result<(), StoreError>;
}

/// Errors writing the store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to create store directory {path}")]
    #[diagnostic(code(tsa::store::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize projects")]
    #[diagnostic(code(tsa::store::serialize))]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write store file {path}")]
    #[diagnostic(
        code(tsa::store::write),
        help("check that the workspace directory is writable")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Store backed by one pretty-printed JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the store file aside, returning where it went
    fn back_up(&self) -> Option<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let mut name = self.path.file_name()?.to_os_string();
        name.push(format!(".corrupt-{}", stamp));
        let backup = self.path.with_file_name(name);

        match fs::rename(&self.path, &backup) {
            Ok(()) => {
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "store could not be fully read, moved it aside"
                );
                Some(backup)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to back up unreadable store"
                );
                None
            }
        }
    }
}

impl ProjectStore for JsonFileStore {
    fn load_all(&self) -> ProjectMap {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file not found");
                return ProjectMap::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read store");
                self.back_up();
                return ProjectMap::new();
            }
        };

        let (projects, complete) = parse_store(&content);
        if !complete {
            self.back_up();
        }
        projects
    }

    fn save_all(&self, projects: &ProjectMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(projects)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), count = projects.len(), "store saved");
        Ok(())
    }
}

/// Parse the store contents record by record
pub fn parse_projects(content: &str) -> ProjectMap {
    parse_store(content).0
}

/// Parse the store, also reporting whether every record was kept
fn parse_store(content: &str) -> (ProjectMap, bool) {
    let records: BTreeMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "store is corrupt, starting with no projects");
            return (ProjectMap::new(), false);
        }
    };

    let mut complete = true;
    let mut projects = ProjectMap::new();
    for (key, record) in records {
        match serde_json::from_value::<Project>(record) {
            Ok(mut project) => {
                if project.id.is_empty() {
                    project.id = ProjectId::from(key);
                }
                projects.insert(project.id.clone(), project);
            }
            Err(e) => {
                tracing::warn!(record = %key, error = %e, "skipping unreadable project record");
                complete = false;
            }
        }
    }
    (projects, complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InspectionData;
    use crate::scoring::{compute_span, ConstructionType};
    use tempfile::tempdir;

    fn sample_projects() -> ProjectMap {
        let mut project = Project::new("Namsan Tunnel 3");
        project.inspector = "Kim".to_string();
        let id = project.add_section(ConstructionType::NatmPlain, 50.0, 20.0).unwrap();
        let section = project.section_mut(id).unwrap();
        let ty = section.construction_type();
        let span = section.span_mut(3).unwrap();
        *span.data_mut() = InspectionData {
            crack_width: 1.5,
            leakage: "c".into(),
            ..InspectionData::default()
        };
        compute_span(span, ty);

        let mut projects = ProjectMap::new();
        projects.insert(project.id.clone(), project);
        let mut empty = Project::new("Empty");
        empty.id = ProjectId::from("PRJ-EMPTY");
        projects.insert(empty.id.clone(), empty);
        projects
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.load_all().is_empty());
    }

    fn backups(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("projects.json.corrupt-"))
            .collect()
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::new(&path).load_all().is_empty());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(JsonFileStore::new(&path).load_all().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_kept_aside_before_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load_all().is_empty());
        assert!(!path.exists());

        let saved = backups(dir.path());
        assert_eq!(saved.len(), 1);
        let content = fs::read_to_string(dir.path().join(&saved[0])).unwrap();
        assert_eq!(content, "{ not json");

        store.save_all(&sample_projects()).unwrap();
        assert_eq!(backups(dir.path()).len(), 1);
    }

    #[test]
    fn test_skipped_record_keeps_original_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        let original = r#"{"PRJ-GOOD": {"name": "Good"}, "PRJ-BAD": {"sections": 7}}"#;
        fs::write(&path, original).unwrap();

        assert_eq!(JsonFileStore::new(&path).load_all().len(), 1);
        let saved = backups(dir.path());
        assert_eq!(saved.len(), 1);
        assert_eq!(fs::read_to_string(dir.path().join(&saved[0])).unwrap(), original);
    }

    #[test]
    fn test_clean_load_leaves_file_in_place() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(STORE_FILE));
        store.save_all(&sample_projects()).unwrap();

        assert_eq!(store.load_all().len(), 2);
        assert!(store.path().exists());
        assert!(backups(dir.path()).is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join(STORE_FILE));
        let projects = sample_projects();

        store.save_all(&projects).unwrap();
        assert!(store.path().exists());

        let loaded = store.load_all();
        assert_eq!(loaded, projects);
    }

    #[test]
    fn test_save_overwrites_whole_collection() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(STORE_FILE));
        let mut projects = sample_projects();
        store.save_all(&projects).unwrap();

        projects.remove(&ProjectId::from("PRJ-EMPTY"));
        store.save_all(&projects).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let projects = parse_projects(
            r#"{
                "PRJ-GOOD": {"id": "PRJ-GOOD", "name": "Good"},
                "PRJ-BAD": {"id": "PRJ-BAD", "sections": "not a list"}
            }"#,
        );
        assert_eq!(projects.len(), 1);
        assert!(projects.contains_key(&ProjectId::from("PRJ-GOOD")));
    }

    #[test]
    fn test_empty_id_takes_map_key() {
        let projects = parse_projects(r#"{"1700000000": {"name": "Legacy"}}"#);
        let project = projects.get(&ProjectId::from("1700000000")).unwrap();
        assert_eq!(project.id.as_str(), "1700000000");
        assert_eq!(project.name, "Legacy");
    }

    #[test]
    fn test_malformed_cache_is_dropped() {
        let projects = parse_projects(
            r#"{"P": {"sections": [{"id": 1, "spans": [
                {"span_no": 1, "length": 20.0, "result_cache": {"f_value": "bad"}}
            ]}]}}"#,
        );
        let project = &projects[&ProjectId::from("P")];
        assert!(project.sections()[0].spans()[0].result().is_none());
    }
}
