//! Error types for loading, merging and serving kubeconfigs.

use crate::kubeconfig::Section;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A stored document could not be read or parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("can't read kubeconfig file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse kubeconfig file {path:?}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A merge precondition on the incoming document was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("kubeconfig has no {0}s")]
    EmptySection(Section),

    #[error("kubeconfig has more than one {0}")]
    MultipleEntries(Section),

    #[error("kubeconfig has duplicate {section} name: {name}")]
    DuplicateName { section: Section, name: String },
}

/// The config store could not be built.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("config directory does not exist: {0:?}")]
    MissingDirectory(PathBuf),

    #[error("config directory is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("failed to read configs directory {path:?}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load kubeconfig {path:?}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("config name '{name}' is provided by both {first:?} and {second:?}")]
    DuplicateConfigName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to merge config '{name}' during validation")]
    Unmergeable {
        name: String,
        #[source]
        source: MergeError,
    },
}

/// A request for a merged document failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("kubeconfig not found: {0}")]
    NotFound(String),

    #[error("failed to merge kubeconfig: {name}: {source}")]
    Merge {
        name: String,
        #[source]
        source: MergeError,
    },
}

/// A value could not be written in the requested encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigNotFound,
    MergeFailed,
    EncodeFailed,
}

/// Structured error body returned by the HTTP layer.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::ConfigNotFound
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let code = match err {
            ResolveError::NotFound(_) => ErrorCode::ConfigNotFound,
            ResolveError::Merge { .. } => ErrorCode::MergeFailed,
        };
        Self::new(code, err.to_string())
    }
}

impl From<EncodeError> for ApiError {
    fn from(err: EncodeError) -> Self {
        Self::new(ErrorCode::EncodeFailed, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
