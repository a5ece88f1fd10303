//! Scaffold core library: shared domain types, configuration errors and the
//! YAML generation plan.
//!
//! - [`types`]: [`FileMode`], [`ResolutionFlags`], [`ResolutionMode`]
//! - [`error`]: [`ConfigError`]
//! - [`plan`]: load a [`GenerationPlan`] from disk

pub mod error;
pub mod plan;
pub mod types;

pub use error::ConfigError;
pub use plan::{ContentSource, FileSpec, GenerationPlan, GroupSpec};
pub use types::{FileMode, ResolutionFlags, ResolutionMode};
