//! `scaffold diff <old> <new>`: unified diff of two files on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scaffold_diff::{DiffEngine, DiffOptions};

use crate::prompt::paint_diff;

/// Arguments for `scaffold diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// The original file.
    pub old: PathBuf,

    /// The modified file.
    pub new: PathBuf,

    /// Unchanged lines of context around each change.
    #[arg(long, default_value_t = 3)]
    pub context: usize,

    /// Columns per tab stop.
    #[arg(long, default_value_t = 4)]
    pub tab_width: usize,

    /// Prefix lines with old/new line numbers.
    #[arg(long)]
    pub line_numbers: bool,

    /// Truncate line bodies to this many display columns.
    #[arg(long)]
    pub width: Option<usize>,
}

impl DiffArgs {
    fn options(&self) -> DiffOptions {
        DiffOptions {
            context_lines: self.context,
            tab_width: self.tab_width,
            show_line_numbers: self.line_numbers,
            max_width: self.width,
        }
    }

    pub fn run(self) -> Result<()> {
        let old = std::fs::read(&self.old)
            .with_context(|| format!("failed to read {}", self.old.display()))?;
        let new = std::fs::read(&self.new)
            .with_context(|| format!("failed to read {}", self.new.display()))?;

        let text = DiffEngine::new().compute_labeled(
            &format!("a/{}", self.old.display()),
            &old,
            &format!("b/{}", self.new.display()),
            &new,
            &self.options(),
        );

        if text.is_empty() {
            println!("No differences.");
            return Ok(());
        }
        print!("{}", paint_diff(&text));
        Ok(())
    }
}
