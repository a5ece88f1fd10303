//! # scaffold-renderer
//!
//! Tera-based rendering of candidate file content, backed by a template cache
//! that many generation tasks can share.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use scaffold_renderer::Renderer;
//!
//! let renderer = Renderer::new(Some(Path::new("templates")));
//! let mut vars = BTreeMap::new();
//! vars.insert("name", "user");
//! if let Ok(content) = renderer.render("model.rs.tera", &vars) {
//!     println!("{content}");
//! }
//! ```

pub mod cache;
pub mod engine;
pub mod error;

pub use cache::{CompiledTemplate, TemplateCache};
pub use engine::Renderer;
pub use error::RenderError;
