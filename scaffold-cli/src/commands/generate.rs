//! `scaffold generate <plan>`: render a generation plan and write it safely.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use scaffold_core::{GenerationPlan, ResolutionFlags};
use scaffold_diff::DiffOptions;
use scaffold_renderer::Renderer;
use scaffold_write::{pipeline::build_operations, run, ConflictResolver, RunOptions};

use crate::prompt::TerminalPrompter;

/// Arguments for `scaffold generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the YAML generation plan.
    pub plan: PathBuf,

    /// Validate and list what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite existing files without asking.
    #[arg(long)]
    pub force: bool,

    /// Keep every existing file without asking.
    #[arg(long)]
    pub skip: bool,

    /// Show the diff for each conflict before asking.
    #[arg(long)]
    pub diff: bool,
}

impl GenerateArgs {
    pub fn run(self, verbose: bool) -> Result<()> {
        let flags = ResolutionFlags {
            force: self.force,
            skip: self.skip,
            diff: self.diff,
        };
        let resolver = ConflictResolver::new(
            flags,
            Arc::new(TerminalPrompter::new()),
            DiffOptions::default(),
        )
        .context("invalid conflict options")?;

        let plan = GenerationPlan::load(&self.plan)
            .with_context(|| format!("could not load plan {}", self.plan.display()))?;
        tracing::info!(
            "plan {}: {} file(s) into {}",
            self.plan.display(),
            plan.file_count(),
            plan.output_dir.display()
        );

        let renderer = Renderer::new(plan.template_dir.as_deref());
        let mut operations = build_operations(&plan, &renderer, Some(Arc::new(resolver)))
            .context("failed to prepare generation")?;

        let mut stdout = std::io::stdout();
        let summary = run(
            &mut operations,
            RunOptions {
                dry_run: self.dry_run,
                force: self.force,
                verbose,
                out: &mut stdout,
            },
        )
        .context("generation failed")?;

        if summary.dry_run {
            println!(
                "[dry-run] {} operation(s) validated, nothing written",
                summary.validated
            );
        } else {
            println!("Done: {} operation(s) executed", summary.executed);
        }
        Ok(())
    }
}
