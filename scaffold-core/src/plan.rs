//! YAML generation plan.
//!
//! A plan lists the files one generation run should produce. Paths in the plan
//! are relative; they are resolved against the plan's directory on load.
//!
//! ```yaml
//! output: out
//! templates: templates
//! vars:
//!   name: user
//! files:
//!   - path: README.md
//!     content: "# generated\n"
//!   - path: src/config.rs
//!     template: config.rs.tera
//!     keep_existing: true
//! groups:
//!   - name: user resource
//!     files:
//!       - path: src/models/user.rs
//!         template: model.rs.tera
//!       - path: tests/user_test.rs
//!         template: model_test.rs.tera
//!         mode: "644"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::FileMode;

/// Template variables, kept as YAML values so any shape survives the trip to
/// the renderer.
pub type Vars = BTreeMap<String, serde_yaml::Value>;

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlan {
    output: Option<PathBuf>,
    templates: Option<PathBuf>,
    #[serde(default)]
    vars: Vars,
    #[serde(default)]
    files: Vec<RawFile>,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFile {
    path: PathBuf,
    template: Option<String>,
    content: Option<String>,
    mode: Option<serde_yaml::Value>,
    #[serde(default)]
    keep_existing: bool,
    #[serde(default)]
    vars: Vars,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    name: String,
    #[serde(default)]
    files: Vec<RawFile>,
}

// ---------------------------------------------------------------------------
// Resolved plan
// ---------------------------------------------------------------------------

/// Where a file's content comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// Literal content; the empty string is a valid value.
    Inline(String),
    /// Name of a template inside the plan's template directory.
    Template(String),
    /// Neither was given. Surfaces as a validation error when the run starts.
    Unset,
}

/// One file the run should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    /// Absolute (plan-resolved) target path.
    pub path: PathBuf,
    pub source: ContentSource,
    pub mode: FileMode,
    /// Write only if the target does not exist yet.
    pub keep_existing: bool,
    /// Plan-level vars overlaid with this entry's own vars.
    pub vars: Vars,
}

/// Files that must appear together or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub name: String,
    pub files: Vec<FileSpec>,
}

/// A fully resolved generation plan.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    /// Directory every relative target path is resolved against.
    pub output_dir: PathBuf,
    /// Directory templates are loaded from, if the plan uses any.
    pub template_dir: Option<PathBuf>,
    pub files: Vec<FileSpec>,
    pub groups: Vec<GroupSpec>,
}

impl GenerationPlan {
    /// Load and resolve a plan from `path`.
    ///
    /// Returns [`ConfigError::Io`] if unreadable and [`ConfigError::Parse`]
    /// (with path + line context) if malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml_str(&contents, base, path)
    }

    /// Resolve a plan from YAML text. `base` anchors relative paths; `origin`
    /// is only used in error messages.
    pub fn from_yaml_str(yaml: &str, base: &Path, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawPlan = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let output_dir = match raw.output {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        };
        let template_dir = raw.templates.map(|dir| base.join(dir));

        let files = raw
            .files
            .into_iter()
            .map(|f| resolve_file(f, &output_dir, &raw.vars))
            .collect::<Result<Vec<_>, _>>()?;

        let groups = raw
            .groups
            .into_iter()
            .map(|g| {
                let files = g
                    .files
                    .into_iter()
                    .map(|f| resolve_file(f, &output_dir, &raw.vars))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(GroupSpec {
                    name: g.name,
                    files,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(GenerationPlan {
            output_dir,
            template_dir,
            files,
            groups,
        })
    }

    /// Total number of target files across loose entries and groups.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.groups.iter().map(|g| g.files.len()).sum::<usize>()
    }
}

fn resolve_file(raw: RawFile, output_dir: &Path, shared: &Vars) -> Result<FileSpec, ConfigError> {
    let path = output_dir.join(&raw.path);

    let source = match (raw.content, raw.template) {
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousContent { path }),
        (Some(content), None) => ContentSource::Inline(content),
        (None, Some(template)) => ContentSource::Template(template),
        (None, None) => ContentSource::Unset,
    };

    let mode = match raw.mode {
        None => FileMode::DEFAULT,
        Some(serde_yaml::Value::String(s)) => FileMode::parse(&s, &path)?,
        Some(serde_yaml::Value::Number(n)) => {
            return Err(ConfigError::UnquotedMode {
                path,
                value: n.to_string(),
            })
        }
        Some(other) => {
            return Err(ConfigError::InvalidMode {
                path,
                value: format!("{other:?}"),
            })
        }
    };

    let mut vars = shared.clone();
    vars.extend(raw.vars);

    Ok(FileSpec {
        path,
        source,
        mode,
        keep_existing: raw.keep_existing,
        vars,
    })
}
