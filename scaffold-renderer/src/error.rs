//! Error types for scaffold-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template loading and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (syntax, missing variable, serialization).
    #[error("template error in '{name}': {source}")]
    Tera {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// Filesystem error while loading a template.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template was requested but the renderer has no template directory.
    #[error("template '{name}' requested but no template directory is configured")]
    NoTemplateDir { name: String },

    /// Template names must stay inside the template directory.
    #[error("invalid template name '{name}': must be a relative path without '..'")]
    InvalidName { name: String },
}

pub(crate) fn tera_err(name: &str, source: tera::Error) -> RenderError {
    RenderError::Tera {
        name: name.to_owned(),
        source,
    }
}
