//! # scaffold-write
//!
//! Two-phase file generation with conflict resolution and transactional writes.
//!
//! Build a list of [`Operation`]s (or let [`pipeline::build_operations`] build
//! them from a generation plan) and hand it to [`driver::run`]: every operation
//! is validated before any of them executes. Files that must appear together
//! go through a [`Transaction`].

pub mod conflict;
pub mod driver;
pub mod error;
pub mod group;
pub mod operation;
pub mod pipeline;
pub mod resolved;
pub mod transaction;

pub use conflict::{ConflictResolution, ConflictResolver, Prompter, ScriptedPrompter};
pub use driver::{run, RunOptions, RunSummary};
pub use error::WriteError;
pub use group::{GroupMember, WriteGroup};
pub use operation::{Operation, WriteFile, WriteIfAbsent};
pub use resolved::ResolvedWrite;
pub use transaction::Transaction;
