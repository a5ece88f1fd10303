//! Conflict resolution for targets that already exist with different content.
//!
//! The strategy is picked once per run from the mutually exclusive
//! `--force` / `--skip` / `--diff` flags and applied to every conflict.

mod prompt;
mod strategy;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use scaffold_core::{ConfigError, ResolutionFlags, ResolutionMode};
use scaffold_diff::DiffOptions;

use crate::error::WriteError;

pub use prompt::{Prompter, ScriptedPrompter, Shown};
pub use strategy::{Conflict, ConflictStrategy, DiffPresenter, CHOICES, INLINE_DIFF_MAX_LINES};

/// Outcome of resolving one conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Skip,
    Overwrite,
    /// Only ever an intermediate state inside the prompting strategies.
    ShowDiff,
    Cancel,
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictResolution::Skip => "skip",
            ConflictResolution::Overwrite => "overwrite",
            ConflictResolution::ShowDiff => "show diff",
            ConflictResolution::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// The run's conflict strategy.
pub struct ConflictResolver {
    mode: ResolutionMode,
    strategy: Box<dyn ConflictStrategy>,
}

impl fmt::Debug for ConflictResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConflictResolver")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ConflictResolver {
    /// Build the resolver for `flags`.
    ///
    /// Fails with [`ConfigError::ConflictingFlags`] before anything is
    /// prompted or written when more than one flag is set.
    pub fn new(
        flags: ResolutionFlags,
        prompter: Arc<dyn Prompter>,
        diff_options: DiffOptions,
    ) -> Result<Self, ConfigError> {
        Ok(Self::from_mode(flags.mode()?, prompter, diff_options))
    }

    pub fn from_mode(
        mode: ResolutionMode,
        prompter: Arc<dyn Prompter>,
        diff_options: DiffOptions,
    ) -> Self {
        let presenter = Arc::new(DiffPresenter::new(diff_options));
        let strategy: Box<dyn ConflictStrategy> = match mode {
            ResolutionMode::Force => Box::new(strategy::Force),
            ResolutionMode::Skip => Box::new(strategy::Skip),
            ResolutionMode::DiffThenDecide => {
                Box::new(strategy::ShowDiffThenDecide::new(prompter, presenter))
            }
            ResolutionMode::Interactive => Box::new(strategy::Interactive::new(prompter, presenter)),
        };
        tracing::debug!("conflict strategy: {mode}");
        ConflictResolver { mode, strategy }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Decide what happens to `path`, which exists as `existing` while the
    /// run wants to write `proposed`.
    ///
    /// Never returns [`ConflictResolution::ShowDiff`].
    pub fn resolve(
        &self,
        path: &Path,
        existing: &[u8],
        proposed: &[u8],
    ) -> Result<ConflictResolution, WriteError> {
        let conflict = Conflict {
            path,
            existing,
            proposed,
        };
        let resolution = match self.strategy.resolve(&conflict)? {
            ConflictResolution::ShowDiff => {
                tracing::warn!(
                    "strategy left {} undecided; treating it as cancel",
                    path.display()
                );
                ConflictResolution::Cancel
            }
            other => other,
        };

        if resolution == ConflictResolution::Cancel {
            tracing::warn!("cancelled at {}", path.display());
        } else {
            tracing::info!("conflict at {}: {resolution}", path.display());
        }
        Ok(resolution)
    }
}
