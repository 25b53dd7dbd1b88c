//! Revisions, fragments and the wiring attached to a resolved revision.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::attribute::AttributeValue;
use crate::capability::{Capability, Requirement};
use crate::error::{Error, Result};
use crate::id::{ModuleId, RevisionId};
use crate::wire::Wire;

/// Whether a revision stands on its own or attaches to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionKind {
    Normal,
    /// Contributes its capabilities through `host`. Its dependency direction
    /// is inverted: it requires the host, but the host depends on it at run
    /// time.
    Fragment { host: RevisionId },
}

/// One immutable version of a module's declared contract.
///
/// The declared capabilities and requirements never change. The only
/// mutable state is the [`Wiring`] the lifecycle manager attaches after
/// resolution and clears on teardown.
///
/// Wires hold their provider revisions, so mutually dependent revisions
/// form reference cycles through their wirings. Call
/// [`Revision::invalidate_wiring`] when a revision is torn down.
#[derive(Debug)]
pub struct Revision {
    id: RevisionId,
    kind: RevisionKind,
    capabilities: Vec<Capability>,
    requirements: Vec<Requirement>,
    wiring: RwLock<Option<Arc<Wiring>>>,
}

impl Revision {
    /// Start building a revision with the given identity.
    pub fn builder(id: RevisionId) -> RevisionBuilder {
        RevisionBuilder {
            id,
            kind: RevisionKind::Normal,
            capabilities: Vec::new(),
            requirements: Vec::new(),
        }
    }

    pub fn id(&self) -> RevisionId {
        self.id
    }

    pub fn module_id(&self) -> ModuleId {
        self.id.module
    }

    pub fn kind(&self) -> RevisionKind {
        self.kind
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.kind, RevisionKind::Fragment { .. })
    }

    /// The host revision, for fragments.
    pub fn host(&self) -> Option<RevisionId> {
        match self.kind {
            RevisionKind::Fragment { host } => Some(host),
            RevisionKind::Normal => None,
        }
    }

    /// Declared capabilities, optionally restricted to one namespace.
    pub fn capabilities<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Capability> + 'a {
        self.capabilities
            .iter()
            .filter(move |cap| namespace.is_none_or(|ns| cap.namespace() == ns))
    }

    /// Declared requirements, optionally restricted to one namespace.
    pub fn requirements<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Requirement> + 'a {
        self.requirements
            .iter()
            .filter(move |req| namespace.is_none_or(|ns| req.namespace() == ns))
    }

    /// The current wiring, or `None` if the revision is unresolved or its
    /// wiring was invalidated.
    pub fn wiring(&self) -> Option<Arc<Wiring>> {
        self.wiring.read().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.wiring.read().is_some()
    }

    /// Attach the wiring produced by resolution, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignWire`] if any wire is required by a different
    /// revision.
    pub fn set_wiring(&self, required: Vec<Wire>) -> Result<Arc<Wiring>> {
        if let Some(foreign) = required.iter().find(|w| w.requirer() != self.id) {
            return Err(Error::ForeignWire {
                requirer: foreign.requirer(),
                revision: self.id,
            });
        }
        let wiring = Arc::new(Wiring {
            revision: self.id,
            required,
        });
        *self.wiring.write() = Some(Arc::clone(&wiring));
        Ok(wiring)
    }

    /// Drop the current wiring, returning it if there was one.
    pub fn invalidate_wiring(&self) -> Option<Arc<Wiring>> {
        self.wiring.write().take()
    }
}

impl PartialEq for Revision {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Revision {}

impl Hash for Revision {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Builder for [`Revision`]. Every declared capability and requirement is
/// owned by the revision being built.
#[derive(Debug)]
pub struct RevisionBuilder {
    id: RevisionId,
    kind: RevisionKind,
    capabilities: Vec<Capability>,
    requirements: Vec<Requirement>,
}

impl RevisionBuilder {
    /// Mark the revision as a fragment of `host`.
    pub fn fragment_of(mut self, host: RevisionId) -> Self {
        self.kind = RevisionKind::Fragment { host };
        self
    }

    pub fn capability<K, V>(
        mut self,
        namespace: impl Into<String>,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let cap = attributes
            .into_iter()
            .fold(Capability::new(self.id, namespace), |cap, (k, v)| {
                cap.with_attribute(k, v)
            });
        self.capabilities.push(cap);
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.capabilities.push(Capability::package(self.id, package));
        self
    }

    pub fn module_reference(mut self, symbolic_name: impl Into<String>) -> Self {
        self.capabilities
            .push(Capability::module_reference(self.id, symbolic_name));
        self
    }

    pub fn host(mut self, symbolic_name: impl Into<String>) -> Self {
        self.capabilities.push(Capability::host(self.id, symbolic_name));
        self
    }

    pub fn requirement(mut self, namespace: impl Into<String>, filter: impl Into<String>) -> Self {
        self.requirements
            .push(Requirement::new(self.id, namespace, filter));
        self
    }

    pub fn build(self) -> Arc<Revision> {
        Arc::new(Revision {
            id: self.id,
            kind: self.kind,
            capabilities: self.capabilities,
            requirements: self.requirements,
            wiring: RwLock::new(None),
        })
    }
}

/// The resolved state of one revision: the wires its requirements use.
#[derive(Debug)]
pub struct Wiring {
    revision: RevisionId,
    required: Vec<Wire>,
}

impl Wiring {
    pub fn revision(&self) -> RevisionId {
        self.revision
    }

    /// Wires where this revision is the requirer, optionally restricted to
    /// capabilities in one namespace.
    pub fn required_wires<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Wire> + 'a {
        self.required
            .iter()
            .filter(move |w| namespace.is_none_or(|ns| w.capability().namespace() == ns))
    }

    pub fn has_required_wires(&self) -> bool {
        !self.required.is_empty()
    }
}
