//! # scaffold-diff
//!
//! Line-level diff engine used to show what a generator is about to change.
//!
//! - [`myers`]: shortest edit script ([`DiffEngine`])
//! - [`hunk`]: groups the script into context-bounded [`Hunk`]s
//! - [`render`]: unified-diff text
//!
//! ## Usage
//!
//! ```rust
//! use scaffold_diff::{compute_diff, DiffOptions};
//!
//! let text = compute_diff(b"a\nb\nc\n", b"a\nx\nc\n", &DiffOptions::default());
//! assert!(text.contains("-b\n"));
//! assert!(text.contains("+x\n"));
//! ```

pub mod hunk;
pub mod myers;
pub mod render;
pub mod types;

pub use hunk::build_hunks;
pub use myers::{DiffEngine, BINARY_SNIFF_LEN, MAX_DIFF_LINES, MAX_EDIT_DISTANCE};
pub use render::{render_comparison, BINARY_MARKER, EQUIVALENT_TEXT_MARKER};
pub use types::{Comparison, DiffLine, DiffOptions, EditOperation, Hunk, ScriptLine};

/// Diff `old` against `new` with throwaway scratch state, labelled `a` / `b`.
///
/// Reuse a [`DiffEngine`] instead when comparing many files.
pub fn compute_diff(old: &[u8], new: &[u8], options: &DiffOptions) -> String {
    DiffEngine::new().compute(old, new, options)
}
