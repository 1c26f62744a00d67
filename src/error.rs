//! Error types for loading workflow files and runner rosters.
//!
//! The compatibility check and the dispatch input extraction never fail;
//! only the file-facing collaborators produce these errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or parsing workflow and roster files.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A file or directory could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid YAML or does not match the expected shape.
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML could not be read as a raw node tree.
    #[error("{0}")]
    Scan(#[from] yaml_rust2::ScanError),

    /// The YAML parsed but its structure is not a usable workflow.
    #[error("{0}")]
    InvalidStructure(String),
}

impl WorkflowError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for workflow loading operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
