//! The two-phase operation protocol and the basic write operations.
//!
//! Every file-affecting action implements [`Operation`]. `validate` decides
//! whether the action can succeed and must not do partial work; creating the
//! target's parent directory is the one permitted, idempotent side effect.
//! `execute` does the work.

use std::path::{Path, PathBuf};

use scaffold_core::FileMode;

use crate::error::WriteError;
use crate::transaction::Transaction;

/// A unit of filesystem change run by [`crate::driver::run`].
pub trait Operation {
    /// Check that `execute` can succeed. `force` allows replacing existing files.
    fn validate(&mut self, force: bool) -> Result<(), WriteError>;

    /// Perform the change. Only called after every operation in the run validated.
    fn execute(&mut self) -> Result<(), WriteError>;

    /// Human-readable summary, e.g. `create src/models/user.rs`.
    fn describe(&self) -> String;
}

/// Create `path`'s parent directory if needed.
pub(crate) fn ensure_parent(path: &Path, description: &str) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::Prepare {
                description: description.to_owned(),
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Write one file through a single-entry [`Transaction`].
pub(crate) fn commit_single(
    path: &Path,
    content: &str,
    mode: FileMode,
    description: &str,
) -> Result<(), WriteError> {
    let mut tx = Transaction::new();
    tx.stage(path, content, mode)?;
    tx.commit().map_err(|e| e.in_operation(description))
}

// ---------------------------------------------------------------------------
// WriteFile
// ---------------------------------------------------------------------------

/// Write a new file. An existing target is a conflict unless `force` is set.
#[derive(Debug, Clone)]
pub struct WriteFile {
    path: PathBuf,
    content: Option<String>,
    mode: FileMode,
    overwrite: bool,
}

impl WriteFile {
    /// `content: None` means unset, which fails validation; `Some("")` is a
    /// valid empty file.
    pub fn new(path: impl Into<PathBuf>, content: Option<String>, mode: FileMode) -> Self {
        WriteFile {
            path: path.into(),
            content,
            mode,
            overwrite: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Operation for WriteFile {
    fn validate(&mut self, force: bool) -> Result<(), WriteError> {
        let description = self.describe();
        ensure_parent(&self.path, &description)?;

        let exists = self.path.exists();
        if exists && !force {
            return Err(WriteError::Conflict {
                description,
                path: self.path.clone(),
            });
        }
        if self.content.is_none() {
            return Err(WriteError::MissingContent {
                description,
                path: self.path.clone(),
            });
        }
        self.overwrite = exists;
        Ok(())
    }

    fn execute(&mut self) -> Result<(), WriteError> {
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

    fn describe(&self) -> String {
        if self.overwrite {
            format!("overwrite {}", self.path.display())
        } else {
            format!("create {}", self.path.display())
        }
    }
}

// ---------------------------------------------------------------------------
// WriteIfAbsent
// ---------------------------------------------------------------------------

/// Write a file only if nothing exists at the target yet.
///
/// For files a human is expected to customise after the first generation: an
/// existing target makes both `validate` and `execute` succeed without doing
/// anything.
#[derive(Debug, Clone)]
pub struct WriteIfAbsent {
    path: PathBuf,
    content: Option<String>,
    mode: FileMode,
    present: bool,
}

impl WriteIfAbsent {
    pub fn new(path: impl Into<PathBuf>, content: Option<String>, mode: FileMode) -> Self {
        WriteIfAbsent {
            path: path.into(),
            content,
            mode,
            present: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Operation for WriteIfAbsent {
    fn validate(&mut self, _force: bool) -> Result<(), WriteError> {
        let description = self.describe();
        ensure_parent(&self.path, &description)?;

        self.present = self.path.exists();
        if self.present {
            tracing::debug!("keeping existing {}", self.path.display());
            return Ok(());
        }
        if self.content.is_none() {
            return Err(WriteError::MissingContent {
                description,
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<(), WriteError> {
        if self.present {
            return Ok(());
        }
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

    fn describe(&self) -> String {
        if self.present {
            format!("keep existing {}", self.path.display())
        } else {
            format!("create {}", self.path.display())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: Option<&str>) -> WriteFile {
        WriteFile::new(path, content.map(str::to_owned), FileMode::DEFAULT)
    }

    #[test]
    fn validate_creates_parent_but_not_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src").join("models").join("user.rs");
        let mut op = write_file(&path, Some("struct User;"));
        op.validate(false).unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn validate_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let mut op = write_file(&tmp.path().join("a/b.txt"), Some("x"));
        op.validate(false).unwrap();
        op.validate(false).unwrap();
    }

    #[test]
    fn existing_target_conflicts_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("taken.txt");
        fs::write(&path, "mine").unwrap();

        let err = write_file(&path, Some("generated")).validate(false).unwrap_err();
        assert!(matches!(err, WriteError::Conflict { .. }), "got: {err}");
        assert!(err.to_string().contains("taken.txt"));
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn force_overwrites_existing_target() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("taken.txt");
        fs::write(&path, "mine").unwrap();

        let mut op = write_file(&path, Some("generated"));
        op.validate(true).unwrap();
        assert!(op.describe().starts_with("overwrite"));
        op.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "generated");
    }

    #[test]
    fn unset_content_fails_but_empty_content_is_valid() {
        let tmp = TempDir::new().unwrap();
        let err = write_file(&tmp.path().join("unset.txt"), None)
            .validate(false)
            .unwrap_err();
        assert!(matches!(err, WriteError::MissingContent { .. }), "got: {err}");

        let path = tmp.path().join("empty.txt");
        let mut op = write_file(&path, Some(""));
        op.validate(false).unwrap();
        op.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn parent_that_is_a_file_fails_validation() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let err = write_file(&blocker.join("x.txt"), Some("x"))
            .validate(false)
            .unwrap_err();
        assert!(matches!(err, WriteError::Prepare { .. }), "got: {err}");
    }

    #[test]
    fn write_if_absent_creates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let mut op = WriteIfAbsent::new(&path, Some("x = 1\n".into()), FileMode::DEFAULT);
        op.validate(false).unwrap();
        op.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn write_if_absent_leaves_existing_file_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "customised").unwrap();

        let mut op = WriteIfAbsent::new(&path, None, FileMode::DEFAULT);
        op.validate(false).unwrap();
        assert!(op.describe().starts_with("keep existing"));
        op.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "customised");
    }

    #[test]
    fn write_if_absent_ignores_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "customised").unwrap();

        let mut op = WriteIfAbsent::new(&path, Some("generated".into()), FileMode::DEFAULT);
        op.validate(true).unwrap();
        op.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "customised");
    }
}
