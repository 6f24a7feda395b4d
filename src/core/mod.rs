//! Core module - workspace, configuration and persistence

pub mod config;
pub mod identity;
pub mod logging;
pub mod store;
pub mod workspace;

pub use config::{Config, ConfigError};
pub use identity::{IdParseError, ProjectId};
pub use store::{JsonFileStore, ProjectMap, ProjectStore, StoreError};
pub use workspace::{Workspace, WorkspaceError};
