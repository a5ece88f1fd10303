//! The execution driver: validate everything, then execute in order.

use std::io::Write;

use crate::error::WriteError;
use crate::operation::Operation;

/// Settings for one [`run`].
pub struct RunOptions<'a> {
    /// Validate and report, but touch nothing beyond parent directories.
    pub dry_run: bool,
    /// Passed to every `validate`; allows replacing existing files.
    pub force: bool,
    /// Also report each operation as it validates.
    pub verbose: bool,
    /// Where progress lines go.
    pub out: &'a mut dyn Write,
}

/// What a successful [`run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub validated: usize,
    pub executed: usize,
    pub dry_run: bool,
}

/// Run `operations` through the two-phase protocol.
///
/// Every operation is validated before any executes; the first validation
/// failure aborts the run with nothing written. Execution stops at the first
/// failure. Operations that already executed stay on disk; use a
/// [`crate::WriteGroup`] for files that must land together.
pub fn run(
    operations: &mut [Box<dyn Operation>],
    options: RunOptions<'_>,
) -> Result<RunSummary, WriteError> {
    let RunOptions {
        dry_run,
        force,
        verbose,
        out,
    } = options;

    for op in operations.iter_mut() {
        op.validate(force)?;
        tracing::debug!("validated: {}", op.describe());
    }
    if verbose {
        for op in operations.iter() {
            writeln!(out, "· validated {}", op.describe()).map_err(WriteError::Output)?;
        }
    }

    let mut summary = RunSummary {
        validated: operations.len(),
        executed: 0,
        dry_run,
    };

    if dry_run {
        for op in operations.iter() {
            writeln!(out, "✓ [DRY RUN] {}", op.describe()).map_err(WriteError::Output)?;
        }
        return Ok(summary);
    }

    for op in operations.iter_mut() {
        op.execute()?;
        summary.executed += 1;
        writeln!(out, "✓ {}", op.describe()).map_err(WriteError::Output)?;
    }
    tracing::info!("executed {} operation(s)", summary.executed);
    Ok(summary)
}
