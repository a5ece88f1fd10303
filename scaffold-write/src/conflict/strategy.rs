//! Interchangeable conflict strategies.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use scaffold_diff::{render_comparison, DiffEngine, DiffOptions};

use crate::conflict::prompt::Prompter;
use crate::conflict::ConflictResolution;
use crate::error::WriteError;

/// Choices offered by the interactive prompt, in index order.
pub const CHOICES: [&str; 4] = ["Show diff and decide", "Skip", "Overwrite", "Cancel"];

const SHOW_DIFF: usize = 0;
const SKIP: usize = 1;
const OVERWRITE: usize = 2;
const CANCEL: usize = 3;

/// Diffs longer than this many lines go to the scrollable view.
pub const INLINE_DIFF_MAX_LINES: usize = 20;

/// An existing file and the content a generator wants to put there.
#[derive(Debug, Clone, Copy)]
pub struct Conflict<'a> {
    pub path: &'a Path,
    pub existing: &'a [u8],
    pub proposed: &'a [u8],
}

/// Decides what happens to one conflicting path.
pub trait ConflictStrategy: Send + Sync {
    fn resolve(&self, conflict: &Conflict<'_>) -> Result<ConflictResolution, WriteError>;
}

/// Always overwrite, never prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Force;

impl ConflictStrategy for Force {
    fn resolve(&self, _conflict: &Conflict<'_>) -> Result<ConflictResolution, WriteError> {
        Ok(ConflictResolution::Overwrite)
    }
}

/// Always keep the existing file, never prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Skip;

impl ConflictStrategy for Skip {
    fn resolve(&self, _conflict: &Conflict<'_>) -> Result<ConflictResolution, WriteError> {
        Ok(ConflictResolution::Skip)
    }
}

// ---------------------------------------------------------------------------
// Diff display shared by the prompting strategies
// ---------------------------------------------------------------------------

/// Renders conflicts through one reused [`DiffEngine`].
pub struct DiffPresenter {
    engine: Mutex<DiffEngine>,
    options: DiffOptions,
}

impl DiffPresenter {
    pub fn new(options: DiffOptions) -> Self {
        DiffPresenter {
            engine: Mutex::new(DiffEngine::new()),
            options,
        }
    }

    /// Show the diff for `conflict`: inline when short, scrollable when long.
    ///
    /// Returns `false` if the user interrupted the scrollable view.
    pub fn show(&self, prompter: &dyn Prompter, conflict: &Conflict<'_>) -> Result<bool, WriteError> {
        let old_label = format!("a/{}", conflict.path.display());
        let new_label = format!("b/{}", conflict.path.display());

        let (text, lines) = {
            let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
            let comparison = engine.compare(conflict.existing, conflict.proposed, &self.options);
            let text = render_comparison(&comparison, &old_label, &new_label, &self.options);
            (text, comparison.body_line_count())
        };

        if lines > INLINE_DIFF_MAX_LINES {
            let title = format!("Changes to {}", conflict.path.display());
            prompter.present_scrollable_text(&title, &text)
        } else {
            prompter.present_inline_text(&text)?;
            Ok(true)
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive
// ---------------------------------------------------------------------------

/// Ask the user. "Show diff and decide" displays the diff and asks again.
pub struct Interactive {
    prompter: Arc<dyn Prompter>,
    presenter: Arc<DiffPresenter>,
}

impl Interactive {
    pub fn new(prompter: Arc<dyn Prompter>, presenter: Arc<DiffPresenter>) -> Self {
        Interactive {
            prompter,
            presenter,
        }
    }
}

impl ConflictStrategy for Interactive {
    fn resolve(&self, conflict: &Conflict<'_>) -> Result<ConflictResolution, WriteError> {
        let title = format!("{} already exists. What should happen?", conflict.path.display());
        loop {
            match self.prompter.present_choices(&title, &CHOICES)? {
                Some(SHOW_DIFF) => {
                    if !self.presenter.show(self.prompter.as_ref(), conflict)? {
                        return Ok(ConflictResolution::Cancel);
                    }
                }
                Some(SKIP) => return Ok(ConflictResolution::Skip),
                Some(OVERWRITE) => return Ok(ConflictResolution::Overwrite),
                Some(CANCEL) | None => return Ok(ConflictResolution::Cancel),
                Some(other) => {
                    tracing::warn!("ignoring out-of-range choice {other}");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ShowDiffThenDecide
// ---------------------------------------------------------------------------

/// Show the diff up front, then ask as [`Interactive`] does.
pub struct ShowDiffThenDecide {
    prompter: Arc<dyn Prompter>,
    presenter: Arc<DiffPresenter>,
    interactive: Interactive,
}

impl ShowDiffThenDecide {
    pub fn new(prompter: Arc<dyn Prompter>, presenter: Arc<DiffPresenter>) -> Self {
        ShowDiffThenDecide {
            interactive: Interactive::new(Arc::clone(&prompter), Arc::clone(&presenter)),
            prompter,
            presenter,
        }
    }
}

impl ConflictStrategy for ShowDiffThenDecide {
    fn resolve(&self, conflict: &Conflict<'_>) -> Result<ConflictResolution, WriteError> {
        if !self.presenter.show(self.prompter.as_ref(), conflict)? {
            return Ok(ConflictResolution::Cancel);
        }
        self.interactive.resolve(conflict)
    }
}
