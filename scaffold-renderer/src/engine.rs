//! [`Renderer`]: loads templates from a directory through the shared cache.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tera::Context;

use crate::cache::{CompiledTemplate, TemplateCache};
use crate::error::{tera_err, RenderError};

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}

/// Cache key for a template name: forward slashes, no leading `./`.
fn normalize_template_name(name: &str) -> Result<String, RenderError> {
    let invalid = || RenderError::InvalidName {
        name: name.to_owned(),
    };
    let normalized = name.replace('\\', "/");
    let path = Path::new(&normalized);
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }
    if parts.is_empty() {
        return Err(invalid());
    }
    Ok(parts.join("/"))
}

/// Renders named templates from `template_dir`.
///
/// Create once per run and share by reference; every thread rendering through
/// the same `Renderer` shares one [`TemplateCache`].
#[derive(Debug)]
pub struct Renderer {
    template_dir: Option<PathBuf>,
    cache: TemplateCache,
}

impl Renderer {
    pub fn new(template_dir: Option<&Path>) -> Self {
        Renderer {
            template_dir: template_dir.map(Path::to_path_buf),
            cache: TemplateCache::new(),
        }
    }

    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Fetch (and on first use compile) the template called `name`.
    pub fn template(&self, name: &str) -> Result<Arc<CompiledTemplate>, RenderError> {
        let key = normalize_template_name(name)?;
        self.cache.get_or_compile(&key, || self.load_source(&key))
    }

    /// Render template `name` with any serializable variable map.
    pub fn render<V: Serialize>(&self, name: &str, vars: &V) -> Result<String, RenderError> {
        let template = self.template(name)?;
        let ctx = Context::from_serialize(vars).map_err(|e| tera_err(template.name(), e))?;
        template.render(&ctx)
    }

    fn load_source(&self, key: &str) -> Result<String, RenderError> {
        let dir = self
            .template_dir
            .as_deref()
            .ok_or_else(|| RenderError::NoTemplateDir {
                name: key.to_owned(),
            })?;
        let path = dir.join(key);
        tracing::debug!("loading template {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
