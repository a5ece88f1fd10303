//! A file write that consults the conflict resolver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scaffold_core::FileMode;

use crate::conflict::{ConflictResolution, ConflictResolver};
use crate::error::WriteError;
use crate::operation::{commit_single, ensure_parent, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Pending,
    Create,
    Overwrite,
    Unchanged,
    Skip,
}

/// Write a file; an existing target with different content goes to the
/// run's [`ConflictResolver`] during `validate`.
///
/// Identical content and a `Skip` answer both make `execute` a no-op. A
/// `Cancel` answer fails validation with [`WriteError::Cancelled`], which
/// stops the whole run.
#[derive(Debug)]
pub struct ResolvedWrite {
    path: PathBuf,
    content: Option<String>,
    mode: FileMode,
    resolver: Arc<ConflictResolver>,
    decision: Decision,
}

impl ResolvedWrite {
    pub fn new(
        path: impl Into<PathBuf>,
        content: Option<String>,
        mode: FileMode,
        resolver: Arc<ConflictResolver>,
    ) -> Self {
        ResolvedWrite {
            path: path.into(),
            content,
            mode,
            resolver,
            decision: Decision::Pending,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once validation decided the file will actually be written.
    pub fn will_write(&self) -> bool {
        matches!(self.decision, Decision::Create | Decision::Overwrite)
    }
}

impl Operation for ResolvedWrite {
    fn validate(&mut self, force: bool) -> Result<(), WriteError> {
        let description = self.describe();
        ensure_parent(&self.path, &description)?;

        let content = self
            .content
            .as_deref()
            .ok_or_else(|| WriteError::MissingContent {
                description: description.clone(),
                path: self.path.clone(),
            })?;

        if !self.path.exists() {
            self.decision = Decision::Create;
            return Ok(());
        }

        let existing = std::fs::read(&self.path).map_err(|source| WriteError::Prepare {
            description,
            path: self.path.clone(),
            source,
        })?;

        self.decision = if existing == content.as_bytes() {
            tracing::debug!("{} is already up to date", self.path.display());
            Decision::Unchanged
        } else if force {
            Decision::Overwrite
        } else {
            match self
                .resolver
                .resolve(&self.path, &existing, content.as_bytes())?
            {
                ConflictResolution::Overwrite => Decision::Overwrite,
                ConflictResolution::Skip => Decision::Skip,
                ConflictResolution::ShowDiff | ConflictResolution::Cancel => {
                    return Err(WriteError::Cancelled {
                        path: self.path.clone(),
                    });
                }
            }
        };
        Ok(())
    }

    fn execute(&mut self) -> Result<(), WriteError> {
        match self.decision {
            Decision::Pending => Err(WriteError::NotValidated {
                description: self.describe(),
            }),
            Decision::Unchanged | Decision::Skip => Ok(()),
            Decision::Create | Decision::Overwrite => {
                let description = self.describe();
                let content = self
                    .content
                    .as_deref()
                    .ok_or_else(|| WriteError::MissingContent {
                        description: description.clone(),
                        path: self.path.clone(),
                    })?;
                commit_single(&self.path, content, self.mode, &description)
            }
        }
    }

    fn describe(&self) -> String {
        let path = self.path.display();
        match self.decision {
            Decision::Pending | Decision::Create => format!("create {path}"),
            Decision::Overwrite => format!("overwrite {path}"),
            Decision::Unchanged => format!("unchanged {path}"),
            Decision::Skip => format!("skip {path} (kept existing)"),
        }
    }
}
