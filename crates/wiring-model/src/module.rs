//! Modules and their revision history.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::id::{ModuleId, RevisionId};
use crate::revision::Revision;

/// A deployable unit with an ordered revision history.
///
/// Updating a module appends a revision; older revisions stay in the history
/// until the module is refreshed, because other modules may still be wired
/// to them.
#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    symbolic_name: String,
    revisions: RwLock<Vec<Arc<Revision>>>,
}

impl Module {
    pub fn new(id: ModuleId, symbolic_name: impl Into<String>) -> Self {
        Self {
            id,
            symbolic_name: symbolic_name.into(),
            revisions: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }

    /// Snapshot of every revision, oldest first.
    pub fn revisions(&self) -> Vec<Arc<Revision>> {
        self.revisions.read().clone()
    }

    /// The most recently added revision.
    pub fn current_revision(&self) -> Option<Arc<Revision>> {
        self.revisions.read().last().cloned()
    }

    /// Identity for the next revision to be added.
    pub fn next_revision_id(&self) -> RevisionId {
        let sequence = self
            .revisions
            .read()
            .last()
            .map_or(0, |rev| rev.id().sequence + 1);
        self.id.revision(sequence)
    }

    /// Append a revision, making it current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignRevision`] if the revision belongs to another
    /// module.
    pub fn add_revision(&self, revision: Arc<Revision>) -> Result<()> {
        if revision.module_id() != self.id {
            return Err(Error::ForeignRevision {
                module: self.id,
                revision: revision.id(),
            });
        }
        self.revisions.write().push(revision);
        Ok(())
    }

    /// Drop every revision but the current one, returning the dropped ones.
    pub fn purge_revisions(&self) -> Vec<Arc<Revision>> {
        let mut revisions = self.revisions.write();
        let keep_from = revisions.len().saturating_sub(1);
        revisions.drain(..keep_from).collect()
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Module {}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
