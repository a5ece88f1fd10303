//! Error types for scaffold-core.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected before any file is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// More than one of the mutually exclusive conflict flags was set.
    #[error("conflicting resolution flags: {flags} are mutually exclusive; pick one")]
    ConflictingFlags { flags: String },

    /// The generation plan could not be read.
    #[error("failed to read generation plan at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse generation plan at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A `mode` value that is not an octal permission string.
    #[error("invalid file mode '{value}' for {path}; expected octal such as \"644\"")]
    InvalidMode { path: PathBuf, value: String },

    /// An unquoted `mode`. YAML has already turned it into a number, and
    /// `0o644` or `0x1a4` no longer look like what was typed.
    #[error("file mode for {path} was read by YAML as the number {value}; quote the mode, e.g. mode: \"755\"")]
    UnquotedMode { path: PathBuf, value: String },

    /// A plan entry named both inline `content` and a `template`.
    #[error("plan entry {path} sets both `content` and `template`; use one")]
    AmbiguousContent { path: PathBuf },
}
