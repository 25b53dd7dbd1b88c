//! The reverse index from provider revisions to the wires depending on them.
//!
//! Every public operation runs under one registry-wide lock, so readers never
//! observe a wire set mid-mutation and empty entries are cleaned up in the
//! same critical section that emptied them.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use wiring_model::{
    Capability, Module, ModuleId, Revision, RevisionId, RevisionKind, Wire, namespace,
};

use crate::config::RegistryConfig;
use crate::snapshot::RegistrySnapshot;

/// Wires depending on a provider revision, grouped by capability.
pub type CapabilityMap = HashMap<Capability, HashSet<Wire>>;

type DependentsMap = HashMap<RevisionId, CapabilityMap>;

/// Framework-wide index of which wires depend on which provider revision.
///
/// Invariants, maintained under the lock:
/// - a wire is stored only under its own provider and capability
/// - no capability maps to an empty wire set
/// - no provider maps to an empty capability map
/// - fragment revisions are never keys; their dependency on the host is
///   read from the fragment's own wiring
#[derive(Debug, Default)]
pub struct WiringRegistry {
    dependents: Mutex<DependentsMap>,
}

impl WiringRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry sized according to `config`.
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self {
            dependents: Mutex::new(HashMap::with_capacity(config.initial_capacity)),
        }
    }

    /// Record a resolved wire under its provider and capability.
    ///
    /// Inserting a wire that is already present is a no-op.
    pub fn add_dependent(&self, wire: Wire) {
        let provider = wire.provider().id();
        let mut dependents = self.dependents.lock();
        let inserted = dependents
            .entry(provider)
            .or_default()
            .entry(wire.capability().clone())
            .or_default()
            .insert(wire.clone());
        if inserted {
            tracing::trace!(%provider, %wire, "Recorded dependent wire");
        }
    }

    /// Snapshot of the wires depending on `provider`, by capability.
    ///
    /// Empty when the revision has no recorded dependents.
    pub fn get_dependents(&self, provider: &Revision) -> CapabilityMap {
        self.dependents
            .lock()
            .get(&provider.id())
            .cloned()
            .unwrap_or_default()
    }

    /// Whether removing `revision` would break something.
    ///
    /// A fragment counts as having dependents while it is wired to its host,
    /// since removing the host would orphan it. Any other revision has
    /// dependents when the index holds wires it provides.
    pub fn has_dependents(&self, revision: &Revision) -> bool {
        let dependents = self.dependents.lock();
        Self::has_dependents_locked(&dependents, revision)
    }

    /// Whether any revision of `module`, current or old, has dependents.
    pub fn has_dependents_for_module(&self, module: &Module) -> bool {
        let revisions = module.revisions();
        let dependents = self.dependents.lock();
        revisions
            .iter()
            .any(|revision| Self::has_dependents_locked(&dependents, revision))
    }

    /// All wires provided by `revision`, optionally restricted to
    /// capabilities in `namespace`. Order is unspecified.
    pub fn get_provided_wires(&self, revision: &Revision, namespace: Option<&str>) -> Vec<Wire> {
        let dependents = self.dependents.lock();
        let Some(capabilities) = dependents.get(&revision.id()) else {
            return Vec::new();
        };
        capabilities
            .iter()
            .filter(|(cap, _)| namespace.is_none_or(|ns| cap.namespace() == ns))
            .flat_map(|(_, wires)| wires.iter().cloned())
            .collect()
    }

    /// Modules that depend on any revision of `module`.
    ///
    /// For a fragment revision the dependents are its hosts, taken from the
    /// fragment's own wiring.
    pub fn get_dependent_modules(&self, module: &Module) -> HashSet<ModuleId> {
        let revisions = module.revisions();
        let dependents = self.dependents.lock();
        let mut result = HashSet::new();

        for revision in &revisions {
            match revision.kind() {
                RevisionKind::Fragment { .. } => {
                    if let Some(wiring) = revision.wiring() {
                        result.extend(wiring.required_wires(None).map(Wire::provider_module));
                    }
                }
                RevisionKind::Normal => {
                    if let Some(capabilities) = dependents.get(&revision.id()) {
                        result.extend(capabilities.values().flatten().map(Wire::requirer_module));
                    }
                }
            }
        }

        result
    }

    /// Modules importing the package exported as `capability` by `module`.
    ///
    /// Modules that require `module` as a whole are counted as importers of
    /// every package it exports.
    pub fn get_importing_modules(
        &self,
        module: &Module,
        capability: &Capability,
    ) -> HashSet<ModuleId> {
        let package = capability.package_name();
        self.collect_requirers(module, |cap| match cap.namespace() {
            namespace::PACKAGE => package.is_some() && cap.package_name() == package,
            namespace::MODULE => true,
            _ => false,
        })
    }

    /// Modules requiring `module` as a whole, excluding package importers.
    pub fn get_requiring_modules(&self, module: &Module) -> HashSet<ModuleId> {
        self.collect_requirers(module, |cap| cap.namespace() == namespace::MODULE)
    }

    /// Remove every wire required by any revision of `module`.
    ///
    /// Wires whose provider wiring is already gone are skipped; during
    /// framework shutdown providers may be torn down first.
    pub fn remove_dependencies(&self, module: &Module) {
        let revisions = module.revisions();
        let mut dependents = self.dependents.lock();

        for revision in &revisions {
            let Some(wiring) = revision.wiring() else {
                continue;
            };
            for wire in wiring.required_wires(None) {
                if wire.provider_wiring().is_none() {
                    tracing::debug!(
                        requirer = %revision.id(),
                        provider = %wire.provider().id(),
                        "Provider wiring already disposed, skipping wire"
                    );
                    continue;
                }
                Self::remove_wire_locked(&mut dependents, wire);
            }
        }
    }

    /// Emit the whole index at debug level.
    pub fn dump(&self) {
        let dependents = self.dependents.lock();
        tracing::debug!(providers = dependents.len(), "Wiring registry dependents");
        for (provider, capabilities) in dependents.iter() {
            for (capability, wires) in capabilities {
                let requirers: Vec<String> =
                    wires.iter().map(|w| w.requirer().to_string()).collect();
                tracing::debug!(%provider, %capability, ?requirers, "Dependents");
            }
        }
    }

    /// Serializable copy of the index, sorted for stable output.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::from_dependents(self.dependents.lock().iter())
    }

    /// Total number of recorded wires.
    pub fn len(&self) -> usize {
        self.dependents
            .lock()
            .values()
            .flat_map(HashMap::values)
            .map(HashSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.lock().is_empty()
    }

    /// Number of provider revisions with at least one dependent.
    pub fn provider_count(&self) -> usize {
        self.dependents.lock().len()
    }

    fn has_dependents_locked(dependents: &DependentsMap, revision: &Revision) -> bool {
        let wired_fragment = revision.is_fragment()
            && revision
                .wiring()
                .is_some_and(|wiring| wiring.has_required_wires());
        wired_fragment || dependents.contains_key(&revision.id())
    }

    fn remove_wire_locked(dependents: &mut DependentsMap, wire: &Wire) {
        let Entry::Occupied(mut provider) = dependents.entry(wire.provider().id()) else {
            return;
        };
        let capabilities = provider.get_mut();
        if let Entry::Occupied(mut wires) = capabilities.entry(wire.capability().clone()) {
            if wires.get_mut().remove(wire) {
                tracing::trace!(%wire, "Removed dependent wire");
            }
            if wires.get().is_empty() {
                wires.remove();
            }
        }
        if capabilities.is_empty() {
            provider.remove();
        }
    }

    fn collect_requirers<F>(&self, module: &Module, matches: F) -> HashSet<ModuleId>
    where
        F: Fn(&Capability) -> bool,
    {
        let revisions = module.revisions();
        let dependents = self.dependents.lock();

        revisions
            .iter()
            .filter_map(|revision| dependents.get(&revision.id()))
            .flat_map(|capabilities| capabilities.iter())
            .filter(|&(cap, _)| matches(cap))
            .flat_map(|(_, wires)| wires.iter().map(Wire::requirer_module))
            .collect()
    }
}
