//! Staged multi-file writes with rollback.
//!
//! `commit` applies staged writes strictly in staging order. On the first
//! failure every write this commit already made is undone (a new file is
//! deleted, an overwritten file gets its previous bytes back) and the error
//! naming the failing path is returned. Undo is best effort; its own errors
//! are logged and swallowed.
//!
//! Each file goes through `<path>.scaffold.tmp` followed by a rename, so a
//! failed write never leaves a truncated target behind.

use std::path::{Path, PathBuf};

use scaffold_core::FileMode;

use crate::error::WriteError;

/// One staged `(path, content, permissions)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    pub path: PathBuf,
    pub content: String,
    pub mode: FileMode,
}

/// A write that `commit` already made, with what to restore on undo.
struct Applied {
    path: PathBuf,
    previous: Option<Vec<u8>>,
}

/// An ordered batch of file writes that appear together or not at all.
#[derive(Debug, Default)]
pub struct Transaction {
    staged: Vec<StagedWrite>,
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a write. Fails once the transaction has committed.
    pub fn stage(
        &mut self,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        mode: FileMode,
    ) -> Result<(), WriteError> {
        if self.committed {
            return Err(WriteError::AlreadyCommitted);
        }
        self.staged.push(StagedWrite {
            path: path.into(),
            content: content.into(),
            mode,
        });
        Ok(())
    }

    pub fn staged(&self) -> &[StagedWrite] {
        &self.staged
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Apply every staged write in order.
    ///
    /// A second call is always [`WriteError::AlreadyCommitted`]. A failed
    /// commit leaves the transaction uncommitted with nothing of its own on
    /// disk.
    pub fn commit(&mut self) -> Result<(), WriteError> {
        if self.committed {
            return Err(WriteError::AlreadyCommitted);
        }

        let mut applied: Vec<Applied> = Vec::with_capacity(self.staged.len());
        for staged in &self.staged {
            match apply(staged) {
                Ok(previous) => applied.push(Applied {
                    path: staged.path.clone(),
                    previous,
                }),
                Err(err) => {
                    tracing::warn!(
                        "write to {} failed; undoing {} earlier write(s)",
                        staged.path.display(),
                        applied.len()
                    );
                    undo(&applied);
                    return Err(err);
                }
            }
        }

        self.committed = true;
        tracing::debug!("transaction committed {} file(s)", applied.len());
        Ok(())
    }

    /// Discard every staged write. Only meaningful before `commit`.
    pub fn rollback(&mut self) -> Result<(), WriteError> {
        if self.committed {
            return Err(WriteError::AlreadyCommitted);
        }
        self.staged.clear();
        Ok(())
    }
}

fn tx_err(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Transaction {
        path: path.to_path_buf(),
        source,
    }
}

/// Write one staged file; returns the bytes it replaced, if any.
fn apply(staged: &StagedWrite) -> Result<Option<Vec<u8>>, WriteError> {
    let path = staged.path.as_path();
    let previous = if path.is_file() {
        Some(std::fs::read(path).map_err(|e| tx_err(path, e))?)
    } else {
        None
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| tx_err(path, e))?;
    }
    write_atomic(path, staged.content.as_bytes(), staged.mode).map_err(|e| tx_err(path, e))?;
    tracing::info!("wrote: {}", path.display());
    Ok(previous)
}

fn undo(applied: &[Applied]) {
    for write in applied.iter().rev() {
        let result = match &write.previous {
            Some(bytes) => std::fs::write(&write.path, bytes),
            None => std::fs::remove_file(&write.path),
        };
        if let Err(e) = result {
            tracing::warn!("could not undo write to {}: {e}", write.path.display());
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.scaffold.tmp", path.display()))
}

/// Write `content` to a sibling temp file, apply `mode`, rename into place.
fn write_atomic(path: &Path, content: &[u8], mode: FileMode) -> std::io::Result<()> {
    let tmp = tmp_path(path);
    let result = std::fs::write(&tmp, content)
        .and_then(|()| set_mode(&tmp, mode))
        .and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: FileMode) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode.0))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: FileMode) -> std::io::Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
