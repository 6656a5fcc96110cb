//! Error types for the entity resolver
//!
//! Uses thiserror for the library boundary. "No match" and "ambiguous match"
//! are not errors: they are carried structurally by `MatchResult`.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity_linking::EntityId;

/// Errors returned by the resolution engine
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Malformed input handed to the engine by a caller
#[derive(Error, Debug, PartialEq)]
pub enum InvalidInput {
    #[error("query is not valid UTF-8 text: {0}")]
    NotText(#[from] std::str::Utf8Error),

    #[error("entity {id} at position {index} has an empty canonical name")]
    EmptyCanonicalName { index: usize, id: EntityId },

    #[error("invalid threshold policy: {reason}")]
    Threshold { reason: String },
}

impl ResolveError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ResolveError::InvalidInput(_))
    }
}

impl From<std::str::Utf8Error> for ResolveError {
    fn from(error: std::str::Utf8Error) -> Self {
        ResolveError::InvalidInput(InvalidInput::NotText(error))
    }
}

/// Errors raised while loading entities or aliases
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: String, id: EntityId },

    #[error("Entity {id} has an empty canonical name")]
    EmptyName { id: EntityId },

    #[error("Entity store lock poisoned")]
    Poisoned,
}

/// Errors raised while loading resolver settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
