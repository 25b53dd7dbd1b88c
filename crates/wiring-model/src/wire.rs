//! Resolved dependency edges.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::capability::{Capability, Requirement};
use crate::error::{Error, Result};
use crate::id::{ModuleId, RevisionId};
use crate::revision::{Revision, Wiring};

/// An immutable edge from a requirer's requirement to a provider's capability.
///
/// Wires compare by value: requirer id, requirement, provider id and
/// capability. Two wires built separately for the same edge are equal and
/// hash alike, so set insertion and removal work across independently
/// constructed copies. Cloning is cheap.
///
/// The requirer is held by id only. A requirer's wiring owns its wires, so
/// holding the requirer itself would keep every wired revision alive.
#[derive(Clone)]
pub struct Wire {
    inner: Arc<WireInner>,
}

struct WireInner {
    requirer: RevisionId,
    requirement: Requirement,
    provider: Arc<Revision>,
    capability: Capability,
}

impl Wire {
    /// Create a wire, checking that it is well formed.
    ///
    /// # Errors
    ///
    /// - [`Error::FragmentProvider`] if the provider is a fragment
    /// - [`Error::ProviderMismatch`] if the capability is not owned by the provider
    /// - [`Error::RequirerMismatch`] if the requirement is not owned by the requirer
    /// - [`Error::NamespaceMismatch`] if requirement and capability namespaces differ
    pub fn new(
        requirer: Arc<Revision>,
        requirement: Requirement,
        provider: Arc<Revision>,
        capability: Capability,
    ) -> Result<Self> {
        if provider.is_fragment() {
            return Err(Error::FragmentProvider {
                provider: provider.id(),
            });
        }
        if capability.owner() != provider.id() {
            return Err(Error::ProviderMismatch {
                capability_owner: capability.owner(),
                provider: provider.id(),
            });
        }
        if requirement.owner() != requirer.id() {
            return Err(Error::RequirerMismatch {
                requirement_owner: requirement.owner(),
                requirer: requirer.id(),
            });
        }
        if requirement.namespace() != capability.namespace() {
            return Err(Error::NamespaceMismatch {
                requirement: requirement.namespace().to_string(),
                capability: capability.namespace().to_string(),
            });
        }

        Ok(Self {
            inner: Arc::new(WireInner {
                requirer: requirer.id(),
                requirement,
                provider,
                capability,
            }),
        })
    }

    pub fn requirer(&self) -> RevisionId {
        self.inner.requirer
    }

    pub fn requirement(&self) -> &Requirement {
        &self.inner.requirement
    }

    pub fn provider(&self) -> &Arc<Revision> {
        &self.inner.provider
    }

    pub fn capability(&self) -> &Capability {
        &self.inner.capability
    }

    pub fn requirer_module(&self) -> ModuleId {
        self.inner.requirer.module
    }

    pub fn provider_module(&self) -> ModuleId {
        self.inner.provider.module_id()
    }

    /// The provider's current wiring; `None` once the provider was torn down.
    pub fn provider_wiring(&self) -> Option<Arc<Wiring>> {
        self.inner.provider.wiring()
    }
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.requirer == other.inner.requirer
                && self.inner.provider.id() == other.inner.provider.id()
                && self.inner.requirement == other.inner.requirement
                && self.inner.capability == other.inner.capability)
    }
}

impl Eq for Wire {}

impl Hash for Wire {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.requirer.hash(state);
        self.inner.requirement.hash(state);
        self.inner.provider.id().hash(state);
        self.inner.capability.hash(state);
    }
}

// The provider is printed by id only; its wiring points back at wires.
impl fmt::Debug for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wire")
            .field("requirer", &self.inner.requirer)
            .field("requirement", &self.inner.requirement)
            .field("provider", &self.inner.provider.id())
            .field("capability", &self.inner.capability)
            .finish()
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}]",
            self.inner.requirer,
            self.inner.provider.id(),
            self.inner.capability
        )
    }
}
