//! Files that must appear together, written through one [`Transaction`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scaffold_core::FileMode;

use crate::conflict::{ConflictResolution, ConflictResolver};
use crate::error::WriteError;
use crate::operation::{ensure_parent, Operation};
use crate::transaction::Transaction;

/// One file in a [`WriteGroup`].
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub path: PathBuf,
    pub content: Option<String>,
    pub mode: FileMode,
    /// Leave an existing target untouched instead of treating it as a conflict.
    pub keep_existing: bool,
}

impl GroupMember {
    pub fn new(path: impl Into<PathBuf>, content: Option<String>, mode: FileMode) -> Self {
        GroupMember {
            path: path.into(),
            content,
            mode,
            keep_existing: false,
        }
    }
}

/// An operation whose members are committed as a single [`Transaction`].
///
/// `validate` checks every member the way [`crate::WriteFile`] does (or asks
/// the resolver, when one is attached) and stages the ones to write.
/// `execute` commits: either every staged file lands or none does.
#[derive(Debug)]
pub struct WriteGroup {
    name: String,
    members: Vec<GroupMember>,
    resolver: Option<Arc<ConflictResolver>>,
    transaction: Transaction,
    validated: bool,
}

impl WriteGroup {
    pub fn new(name: impl Into<String>, members: Vec<GroupMember>) -> Self {
        WriteGroup {
            name: name.into(),
            members,
            resolver: None,
            transaction: Transaction::new(),
            validated: false,
        }
    }

    /// Send existing, differing targets to `resolver` instead of failing.
    pub fn with_resolver(mut self, resolver: Arc<ConflictResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Paths staged by the last successful `validate`.
    pub fn staged_paths(&self) -> Vec<&Path> {
        self.transaction
            .staged()
            .iter()
            .map(|s| s.path.as_path())
            .collect()
    }

    fn validate_member(
        &self,
        member: &GroupMember,
        force: bool,
        description: &str,
    ) -> Result<bool, WriteError> {
        ensure_parent(&member.path, description)?;

        let exists = member.path.exists();
        if exists && member.keep_existing {
            tracing::debug!("keeping existing {}", member.path.display());
            return Ok(false);
        }
        let content = member
            .content
            .as_deref()
            .ok_or_else(|| WriteError::MissingContent {
                description: description.to_owned(),
                path: member.path.clone(),
            })?;
        if !exists || force {
            return Ok(true);
        }

        let existing = std::fs::read(&member.path).map_err(|source| WriteError::Prepare {
            description: description.to_owned(),
            path: member.path.clone(),
            source,
        })?;
        if existing == content.as_bytes() {
            return Ok(false);
        }

        match &self.resolver {
            Some(resolver) => match resolver.resolve(&member.path, &existing, content.as_bytes())? {
                ConflictResolution::Overwrite => Ok(true),
                ConflictResolution::Skip => Ok(false),
                ConflictResolution::ShowDiff | ConflictResolution::Cancel => {
                    Err(WriteError::Cancelled {
                        path: member.path.clone(),
                    })
                }
            },
            None => Err(WriteError::Conflict {
                description: description.to_owned(),
                path: member.path.clone(),
            }),
        }
    }
}

impl Operation for WriteGroup {
    fn validate(&mut self, force: bool) -> Result<(), WriteError> {
        let description = self.describe();
        self.validated = false;

        let mut transaction = Transaction::new();
        for member in &self.members {
            if self.validate_member(member, force, &description)? {
                let content = member.content.clone().unwrap_or_default();
                transaction.stage(&member.path, content, member.mode)?;
            }
        }
        tracing::debug!(
            "group '{}': {} of {} file(s) staged",
            self.name,
            transaction.staged().len(),
            self.members.len()
        );
        self.transaction = transaction;
        self.validated = true;
        Ok(())
    }

    fn execute(&mut self) -> Result<(), WriteError> {
        if !self.validated {
            return Err(WriteError::NotValidated {
                description: self.describe(),
            });
        }
        self.transaction
            .commit()
            .map_err(|e| e.in_operation(&self.describe()))
    }

    fn describe(&self) -> String {
        let count = self.members.len();
        let noun = if count == 1 { "file" } else { "files" };
        format!("create group '{}' ({count} {noun})", self.name)
    }
}
