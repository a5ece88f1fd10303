//! Error types for scaffold-write.

use std::path::PathBuf;

use thiserror::Error;

use scaffold_core::ConfigError;
use scaffold_renderer::RenderError;

/// All errors that can arise while validating, executing or committing writes.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Invalid run configuration, e.g. mutually exclusive flags.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Candidate content could not be rendered.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The target exists and overwriting was not allowed.
    #[error("{description}: {path} already exists; rerun with --force to overwrite")]
    Conflict { description: String, path: PathBuf },

    /// The operation was built without content.
    #[error("{description}: no content provided for {path}")]
    MissingContent { description: String, path: PathBuf },

    /// Validation could not inspect the target or create its parent directory.
    #[error("{description}: cannot prepare {path}: {source}")]
    Prepare {
        description: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `execute` was called on an operation that was never validated.
    #[error("{description}: executed before validation")]
    NotValidated { description: String },

    /// A write failed while executing an operation.
    #[error("{description} failed at {path}: {source}")]
    Execution {
        description: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staged write failed; the transaction's earlier writes were undone.
    #[error("transaction rolled back after failing to write {path}: {source}")]
    Transaction {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `commit` (or `stage` / `rollback`) on a transaction that already committed.
    #[error("transaction already committed; refusing to apply it twice")]
    AlreadyCommitted,

    /// The user cancelled at a conflict prompt.
    #[error("generation cancelled at {path}")]
    Cancelled { path: PathBuf },

    /// The prompt could not read input or draw output.
    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    /// The run's output sink rejected a line.
    #[error("failed to write run output: {0}")]
    Output(#[source] std::io::Error),
}

impl WriteError {
    /// Attach an operation description to a transaction failure.
    pub(crate) fn in_operation(self, description: &str) -> WriteError {
        match self {
            WriteError::Transaction { path, source } => WriteError::Execution {
                description: description.to_owned(),
                path,
                source,
            },
            other => other,
        }
    }

    /// True for a user cancellation, which callers must treat as fatal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WriteError::Cancelled { .. })
    }
}
