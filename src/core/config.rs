//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::defaults;
use crate::scoring::ConstructionType;

/// Tool configuration, merged from every layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default inspector for new projects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,

    /// Default inspector position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Default inspector company
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Construction type for new sections (key, label or name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type: Option<String>,

    /// Span length for new sections (m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_length: Option<f64>,

    /// Log filter used when RUST_LOG is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// A config file that could not be used. Loading skips that layer.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("ignoring invalid config {path}: {source}")]
    #[diagnostic(code(tsa::config::invalid), help("run 'tsa config keys' for the known keys"))]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

impl Config {
    /// Load configuration from all sources, merging in priority order.
    /// Files that fail to parse are skipped and returned alongside.
    pub fn load(workspace_config: Option<&Path>) -> (Self, Vec<ConfigError>) {
        let mut config = Config::default();
        let mut problems = Vec::new();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/tsa/config.yaml)
        // 3. Workspace config (.tsa/config.yaml)
        let files = Self::global_config_path()
            .into_iter()
            .chain(workspace_config.map(Path::to_path_buf));
        for path in files {
            match Self::read_file(&path) {
                Ok(Some(layer)) => config.merge(layer),
                Ok(None) => {}
                Err(e) => problems.push(e),
            }
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        (config, problems)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tsa")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Ok(None);
        };
        let blank = contents.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(None);
        }
        serde_yml::from_str::<Config>(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Invalid {
                path: path.to_path_buf(),
                source,
            })
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            inspector: var("TSA_INSPECTOR"),
            position: var("TSA_POSITION"),
            company: var("TSA_COMPANY"),
            log_level: var("TSA_LOG"),
            ..Config::default()
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.inspector.is_some() {
            self.inspector = other.inspector;
        }
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.company.is_some() {
            self.company = other.company;
        }
        if other.default_type.is_some() {
            self.default_type = other.default_type;
        }
        if other.unit_length.is_some() {
            self.unit_length = other.unit_length;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    /// Construction type for new sections. An unrecognised value falls back
    /// to the built-in default.
    pub fn construction_type(&self) -> ConstructionType {
        match self.default_type.as_deref().map(str::parse::<ConstructionType>) {
            Some(Ok(ty)) => ty,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "invalid default_type in config");
                defaults::construction_type()
            }
            None => defaults::construction_type(),
        }
    }

    /// Span length for new sections
    pub fn unit_length(&self) -> f64 {
        self.unit_length
            .filter(|len| len.is_finite() && *len > 0.0)
            .unwrap_or(defaults::UNIT_LENGTH)
    }
}
