//! Shared compiled-template cache.
//!
//! Lookups take the read lock. On a miss the write lock is taken, the key is
//! checked again (another task may have populated it meanwhile) and only then
//! is the template loaded and compiled. Entries are inserted fully compiled,
//! so a reader never sees a partial entry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tera::{Context, Tera};

use crate::error::{tera_err, RenderError};

// ---------------------------------------------------------------------------
// CompiledTemplate
// ---------------------------------------------------------------------------

/// One parsed template, ready to render.
#[derive(Debug)]
pub struct CompiledTemplate {
    name: String,
    tera: Tera,
}

impl CompiledTemplate {
    /// Parse `source` under `name`. Autoescaping is off: output is source
    /// code, not HTML.
    pub fn compile(name: &str, source: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(name, source)
            .map_err(|e| tera_err(name, e))?;
        Ok(CompiledTemplate {
            name: name.to_owned(),
            tera,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with `ctx`. Line endings are normalised to LF.
    pub fn render(&self, ctx: &Context) -> Result<String, RenderError> {
        let rendered = self
            .tera
            .render(&self.name, ctx)
            .map_err(|e| tera_err(&self.name, e))?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// TemplateCache
// ---------------------------------------------------------------------------

/// Key → compiled template map, safe to share across threads.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<String, Arc<CompiledTemplate>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached template for `key`, compiling the source produced by
    /// `load` on first use. `load` runs at most once per key.
    pub fn get_or_compile<F>(&self, key: &str, load: F) -> Result<Arc<CompiledTemplate>, RenderError>
    where
        F: FnOnce() -> Result<String, RenderError>,
    {
        // A panic while holding either lock cannot leave a half-inserted
        // entry, so a poisoned lock is still consistent.
        if let Some(hit) = self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key) {
            tracing::debug!("template cache hit: {key}");
            return Ok(Arc::clone(hit));
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = entries.get(key) {
            tracing::debug!("template cache hit after lock upgrade: {key}");
            return Ok(Arc::clone(hit));
        }

        let source = load()?;
        let compiled = Arc::new(CompiledTemplate::compile(key, &source)?);
        entries.insert(key.to_owned(), Arc::clone(&compiled));
        tracing::debug!("template cache populated: {key}");
        Ok(compiled)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
