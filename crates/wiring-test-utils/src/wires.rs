//! Wire construction the way a resolver would do it.
//!
//! Every helper panics if the requested requirement or capability was not
//! declared; fixtures are expected to be consistent.

use std::sync::Arc;

use wiring_model::{Capability, Revision, Wire, namespace};

fn requirement_for(requirer: &Revision, ns: &str, value: &str) -> wiring_model::Requirement {
    let filter = format!("({ns}={value})");
    requirer
        .requirements(Some(ns))
        .find(|req| req.filter() == filter)
        .cloned()
        .unwrap_or_else(|| panic!("revision {} does not require {filter}", requirer.id()))
}

fn capability_for(provider: &Revision, ns: &str, value: &str) -> Capability {
    provider
        .capabilities(Some(ns))
        .find(|cap| cap.attribute(ns).and_then(|v| v.as_str()) == Some(value))
        .cloned()
        .unwrap_or_else(|| panic!("revision {} does not offer {ns}={value}", provider.id()))
}

fn wire(
    requirer: &Arc<Revision>,
    requirement: wiring_model::Requirement,
    provider: &Arc<Revision>,
    capability: Capability,
) -> Wire {
    Wire::new(
        Arc::clone(requirer),
        requirement,
        Arc::clone(provider),
        capability,
    )
    .expect("fixture wires are well formed")
}

/// Wire `requirer`'s import of `package` to `provider`'s export.
pub fn import_package(requirer: &Arc<Revision>, provider: &Arc<Revision>, package: &str) -> Wire {
    let requirement = requirement_for(requirer, namespace::PACKAGE, package);
    let capability = capability_for(provider, namespace::PACKAGE, package);
    wire(requirer, requirement, provider, capability)
}

/// Wire `requirer`'s whole-module requirement to `provider`.
pub fn require_module(
    requirer: &Arc<Revision>,
    provider: &Arc<Revision>,
    symbolic_name: &str,
) -> Wire {
    let requirement = requirement_for(requirer, namespace::MODULE, symbolic_name);
    let capability = capability_for(provider, namespace::MODULE, symbolic_name);
    wire(requirer, requirement, provider, capability)
}

/// Wire a fragment to its host's attachment point.
pub fn attach_fragment(fragment: &Arc<Revision>, host: &Arc<Revision>, host_name: &str) -> Wire {
    let requirement = requirement_for(fragment, namespace::HOST, host_name);
    let capability = capability_for(host, namespace::HOST, host_name);
    wire(fragment, requirement, host, capability)
}

/// Attach `wires` as the wiring of `revision` and return them.
///
/// Providers that are not resolved yet get an empty wiring, since a
/// revision can only be wired to once it is resolved.
pub fn resolve(revision: &Arc<Revision>, wires: Vec<Wire>) -> Vec<Wire> {
    for wire in &wires {
        if !wire.provider().is_resolved() {
            wire.provider()
                .set_wiring(Vec::new())
                .expect("empty wiring is always valid");
        }
    }
    revision
        .set_wiring(wires.clone())
        .expect("fixture wires are required by the revision being resolved");
    wires
}
