//! Turn a generation plan into operations ready for [`crate::driver::run`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use scaffold_core::{ContentSource, FileSpec, GenerationPlan};
use scaffold_renderer::Renderer;

use crate::conflict::ConflictResolver;
use crate::error::WriteError;
use crate::group::{GroupMember, WriteGroup};
use crate::operation::{Operation, WriteFile, WriteIfAbsent};
use crate::resolved::ResolvedWrite;

/// Build one operation per plan file and one [`WriteGroup`] per plan group,
/// in plan order.
///
/// Template content is rendered up front, on scoped threads that share the
/// renderer's template cache. With a `resolver`, existing targets go through
/// conflict resolution; without one they are plain conflicts unless the run
/// forces.
pub fn build_operations(
    plan: &GenerationPlan,
    renderer: &Renderer,
    resolver: Option<Arc<ConflictResolver>>,
) -> Result<Vec<Box<dyn Operation>>, WriteError> {
    let specs: Vec<&FileSpec> = plan
        .files
        .iter()
        .chain(plan.groups.iter().flat_map(|g| g.files.iter()))
        .collect();
    let mut contents = render_all(&specs, renderer)?.into_iter();

    let mut operations: Vec<Box<dyn Operation>> =
        Vec::with_capacity(plan.files.len() + plan.groups.len());

    for spec in &plan.files {
        let content = contents.next().flatten();
        let op: Box<dyn Operation> = if spec.keep_existing {
            Box::new(WriteIfAbsent::new(&spec.path, content, spec.mode))
        } else {
            match &resolver {
                Some(resolver) => Box::new(ResolvedWrite::new(
                    &spec.path,
                    content,
                    spec.mode,
                    Arc::clone(resolver),
                )),
                None => Box::new(WriteFile::new(&spec.path, content, spec.mode)),
            }
        };
        operations.push(op);
    }

    for group in &plan.groups {
        let members = group
            .files
            .iter()
            .map(|spec| GroupMember {
                path: spec.path.clone(),
                content: contents.next().flatten(),
                mode: spec.mode,
                keep_existing: spec.keep_existing,
            })
            .collect();
        let mut op = WriteGroup::new(&group.name, members);
        if let Some(resolver) = &resolver {
            op = op.with_resolver(Arc::clone(resolver));
        }
        operations.push(Box::new(op));
    }

    tracing::debug!(
        "built {} operation(s) for {} file(s)",
        operations.len(),
        specs.len()
    );
    Ok(operations)
}

/// Render every spec's content, preserving order. `None` marks unset content.
fn render_all(specs: &[&FileSpec], renderer: &Renderer) -> Result<Vec<Option<String>>, WriteError> {
    if specs.is_empty() {
        return Ok(Vec::new());
    }
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let chunk_size = specs.len().div_ceil(workers);

    let chunks: Vec<Result<Vec<Option<String>>, WriteError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = specs
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|spec| render_one(spec, renderer))
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut rendered = Vec::with_capacity(specs.len());
    for chunk in chunks {
        rendered.extend(chunk?);
    }
    Ok(rendered)
}

fn render_one(spec: &FileSpec, renderer: &Renderer) -> Result<Option<String>, WriteError> {
    match &spec.source {
        ContentSource::Inline(text) => Ok(Some(text.clone())),
        ContentSource::Template(name) => {
            tracing::debug!("rendering {name} for {}", spec.path.display());
            Ok(Some(renderer.render(name, &spec.vars)?))
        }
        ContentSource::Unset => Ok(None),
    }
}
