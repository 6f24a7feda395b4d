//! Project identity using prefixed ULIDs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Prefix of generated project ids
pub const PROJECT_PREFIX: &str = "PRJ";

/// Identifier of an inspection project
///
/// New ids look like `PRJ-01J...`. Ids read from a store are kept verbatim
/// so records written by other tools still load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        Self(format!("{}-{}", PROJECT_PREFIX, Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ULID part, if this is a generated id
    pub fn ulid(&self) -> Option<Ulid> {
        self.0
            .strip_prefix(PROJECT_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|ulid| Ulid::from_string(ulid).ok())
    }

    /// Creation time encoded in a generated id
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.ulid().map(|ulid| DateTime::<Utc>::from(ulid.datetime()))
    }

    /// Case-insensitive prefix match, used for abbreviated ids on the
    /// command line
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.to_uppercase().starts_with(&prefix.to_uppercase())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for ProjectId {
    type Err = IdParseError;

    /// Strict parse: only generated ids are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::InvalidFormat(s.to_string()))?;
        if !prefix.eq_ignore_ascii_case(PROJECT_PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }
        let ulid = Ulid::from_string(ulid).map_err(|e| IdParseError::InvalidUlid(e.to_string()))?;
        Ok(Self(format!("{}-{}", PROJECT_PREFIX, ulid)))
    }
}

/// Errors parsing a project id
#[derive(Debug, Error, PartialEq)]
pub enum IdParseError {
    #[error("invalid ID format: {0} (expected PRJ-<ULID>)")]
    InvalidFormat(String),

    #[error("invalid ID prefix: {0}")]
    InvalidPrefix(String),

    #[error("invalid ULID: {0}")]
    InvalidUlid(String),
}
