//! Failure taxonomy for a single backup job
//!
//! None of these abort a batch; each one ends up as the failure detail of the
//! job's outcome.

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("unknown database type: {0}")]
    UnknownDatabaseType(String),

    #[error("unknown backup method: {0}")]
    UnknownMethod(String),

    #[error("{method} requires a {field} name for database '{database}'")]
    MissingTarget {
        method: &'static str,
        field: &'static str,
        database: String,
    },

    #[error("cannot resolve password for database '{database}': {message}")]
    Credential { database: String, message: String },

    #[error("failed to create backup directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {message}")]
    RemoteExecution { context: String, message: String },

    #[error("failed to write backup file {path:?}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {message}")]
    Copy { context: String, message: String },

    #[error("backup created but failed to get size: {0}")]
    Measurement(String),
}

/// Category of a job failure, recorded in the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Configuration,
    Directory,
    RemoteExecution,
    ArtifactWrite,
    Copy,
    Measurement,
}

impl BackupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackupError::UnknownDatabaseType(_)
            | BackupError::UnknownMethod(_)
            | BackupError::MissingTarget { .. }
            | BackupError::Credential { .. } => ErrorKind::Configuration,
            BackupError::Directory { .. } => ErrorKind::Directory,
            BackupError::RemoteExecution { .. } => ErrorKind::RemoteExecution,
            BackupError::ArtifactWrite { .. } => ErrorKind::ArtifactWrite,
            BackupError::Copy { .. } => ErrorKind::Copy,
            BackupError::Measurement(_) => ErrorKind::Measurement,
        }
    }

    /// Wrap a failed external call, keeping the whole anyhow chain
    pub fn remote(context: impl Into<String>, err: anyhow::Error) -> Self {
        BackupError::RemoteExecution {
            context: context.into(),
            message: format!("{:#}", err),
        }
    }

    pub fn copy(context: impl Into<String>, err: anyhow::Error) -> Self {
        BackupError::Copy {
            context: context.into(),
            message: format!("{:#}", err),
        }
    }
}
