//! Capabilities offered and requirements needed by a revision.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::attribute::AttributeValue;
use crate::id::RevisionId;
use crate::namespace;

/// A namespaced contract offered by a revision.
///
/// Equality covers the owning revision, the namespace and every attribute,
/// so two revisions exporting the same package yield distinct capabilities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Capability {
    owner: RevisionId,
    namespace: String,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Capability {
    pub fn new(owner: RevisionId, namespace: impl Into<String>) -> Self {
        Self {
            owner,
            namespace: namespace.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// A package export, keyed by its package identifier.
    pub fn package(owner: RevisionId, package: impl Into<String>) -> Self {
        Self::new(owner, namespace::PACKAGE)
            .with_attribute(namespace::PACKAGE, AttributeValue::String(package.into()))
    }

    /// A whole-module reference, keyed by the module's symbolic name.
    pub fn module_reference(owner: RevisionId, symbolic_name: impl Into<String>) -> Self {
        Self::new(owner, namespace::MODULE)
            .with_attribute(namespace::MODULE, AttributeValue::String(symbolic_name.into()))
    }

    /// The attachment point a host revision offers to its fragments.
    pub fn host(owner: RevisionId, symbolic_name: impl Into<String>) -> Self {
        Self::new(owner, namespace::HOST)
            .with_attribute(namespace::HOST, AttributeValue::String(symbolic_name.into()))
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Re-owns a fragment-contributed capability by the host it is attached to.
    ///
    /// Fragments never provide capabilities themselves; the host exposes them
    /// and receives the wires.
    pub fn hosted_by(&self, host: RevisionId) -> Self {
        Self {
            owner: host,
            namespace: self.namespace.clone(),
            attributes: self.attributes.clone(),
        }
    }

    pub fn owner(&self) -> RevisionId {
        self.owner
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// The package identifier, for capabilities in the package namespace.
    pub fn package_name(&self) -> Option<&str> {
        if self.namespace != namespace::PACKAGE {
            return None;
        }
        self.attribute(namespace::PACKAGE).and_then(AttributeValue::as_str)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.namespace)?;
        for (key, value) in &self.attributes {
            write!(f, "; {key}={value}")?;
        }
        Ok(())
    }
}

/// A namespaced contract a revision needs satisfied.
///
/// The filter is carried verbatim; matching it against capabilities is the
/// resolver's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Requirement {
    owner: RevisionId,
    namespace: String,
    filter: String,
}

impl Requirement {
    pub fn new(owner: RevisionId, namespace: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            owner,
            namespace: namespace.into(),
            filter: filter.into(),
        }
    }

    pub fn owner(&self) -> RevisionId {
        self.owner
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; filter:={}", self.namespace, self.filter)
    }
}
