//! Domain types shared by every scaffold crate.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// FileMode
// ---------------------------------------------------------------------------

/// Unix permission bits for a generated file.
///
/// Applied on Unix after the write; ignored on other platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMode(pub u32);

impl FileMode {
    /// `rw-r--r--`, the mode used when a plan entry names none.
    pub const DEFAULT: FileMode = FileMode(0o644);

    /// `rwxr-xr-x`, for generated scripts.
    pub const EXECUTABLE: FileMode = FileMode(0o755);

    /// Parse an octal mode string: `"644"`, `"0644"` or `"0o644"`.
    ///
    /// `path` is only used to make the error actionable.
    pub fn parse(value: &str, path: &Path) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidMode {
            path: path.to_path_buf(),
            value: value.to_owned(),
        };
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(invalid());
        }
        let bits = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
        if bits > 0o7777 {
            return Err(invalid());
        }
        Ok(FileMode(bits))
    }
}

impl Default for FileMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Conflict resolution flags
// ---------------------------------------------------------------------------

/// Raw conflict flags as supplied by the outer CLI.
///
/// At most one may be set; [`ResolutionFlags::mode`] enforces that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionFlags {
    pub force: bool,
    pub skip: bool,
    pub diff: bool,
}

/// The single conflict strategy selected for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResolutionMode {
    /// Overwrite every conflicting file without asking.
    Force,
    /// Keep every existing file.
    Skip,
    /// Show the diff first, then ask.
    DiffThenDecide,
    /// Ask for each conflict.
    #[default]
    Interactive,
}

impl ResolutionFlags {
    /// Collapse the flags into one [`ResolutionMode`].
    ///
    /// Returns [`ConfigError::ConflictingFlags`] when more than one flag is set.
    pub fn mode(&self) -> Result<ResolutionMode, ConfigError> {
        let set: Vec<&str> = [
            (self.force, "--force"),
            (self.skip, "--skip"),
            (self.diff, "--diff"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();

        match set.as_slice() {
            [] => Ok(ResolutionMode::Interactive),
            ["--force"] => Ok(ResolutionMode::Force),
            ["--skip"] => Ok(ResolutionMode::Skip),
            ["--diff"] => Ok(ResolutionMode::DiffThenDecide),
            many => Err(ConfigError::ConflictingFlags {
                flags: many.join(", "),
            }),
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionMode::Force => "force",
            ResolutionMode::Skip => "skip",
            ResolutionMode::DiffThenDecide => "diff",
            ResolutionMode::Interactive => "interactive",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
