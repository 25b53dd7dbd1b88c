//! End-to-end flows as the lifecycle manager drives them
//!
//! Resolve -> record wires -> decide on uninstall -> tear down -> refresh.

use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use wiring_model::{Module, ModuleId};
use wiring_registry::{RegistryConfig, WiringRegistry};
use wiring_test_utils::{
    ModuleSpec, TestFramework, attach_fragment, import_package, require_module, resolve,
};

#[derive(Debug, PartialEq)]
enum Uninstall {
    Removed,
    Deferred(HashSet<ModuleId>),
}

/// What a lifecycle manager does on uninstall: a module still in use is kept
/// for delayed removal, anything else is torn down immediately.
fn uninstall(registry: &WiringRegistry, module: &Module) -> Uninstall {
    if registry.has_dependents_for_module(module) {
        return Uninstall::Deferred(registry.get_dependent_modules(module));
    }
    teardown(registry, module);
    Uninstall::Removed
}

fn teardown(registry: &WiringRegistry, module: &Module) {
    registry.remove_dependencies(module);
    for revision in module.revisions() {
        revision.invalidate_wiring();
    }
}

fn record(registry: &WiringRegistry, wires: Vec<wiring_model::Wire>) {
    for wire in wires {
        registry.add_dependent(wire);
    }
}

/// log <- api <- app, with cli requiring api as a whole.
fn layered() -> (TestFramework, WiringRegistry) {
    let mut fw = TestFramework::new();
    fw.install("log", ModuleSpec::new().exports("org.log"));
    fw.install("api", ModuleSpec::new().exports("org.api").imports("org.log"));
    fw.install("app", ModuleSpec::new().imports("org.api"));
    fw.install("cli", ModuleSpec::new().requires("api"));

    let registry = WiringRegistry::with_config(&RegistryConfig::default());
    let (log, api, app, cli) = (
        fw.current("log"),
        fw.current("api"),
        fw.current("app"),
        fw.current("cli"),
    );
    record(&registry, resolve(&api, vec![import_package(&api, &log, "org.log")]));
    record(&registry, resolve(&app, vec![import_package(&app, &api, "org.api")]));
    record(&registry, resolve(&cli, vec![require_module(&cli, &api, "api")]));
    (fw, registry)
}

#[test]
fn uninstall_in_use_module_is_deferred() {
    let (fw, registry) = layered();
    let expected: HashSet<_> = [fw.module("app").id(), fw.module("cli").id()].into();

    assert_eq!(uninstall(&registry, &fw.module("api")), Uninstall::Deferred(expected));
    assert_eq!(registry.len(), 3);
}

#[test]
fn uninstall_leaf_first_frees_providers() {
    let (fw, registry) = layered();

    for leaf in ["app", "cli"] {
        assert_eq!(uninstall(&registry, &fw.module(leaf)), Uninstall::Removed);
    }
    assert_eq!(uninstall(&registry, &fw.module("api")), Uninstall::Removed);
    assert_eq!(uninstall(&registry, &fw.module("log")), Uninstall::Removed);
    assert!(registry.is_empty());
}

#[rstest]
#[case("log", &["api"])]
#[case("api", &["app", "cli"])]
#[case("app", &[])]
fn dependent_modules_per_layer(#[case] name: &str, #[case] expected: &[&str]) {
    let (fw, registry) = layered();
    let expected: HashSet<_> = expected.iter().map(|n| fw.module(n).id()).collect();
    assert_eq!(registry.get_dependent_modules(&fw.module(name)), expected);
}

#[test]
fn update_and_refresh_moves_dependents_to_new_revision() {
    let (mut fw, registry) = layered();
    let api = fw.module("api");
    let old = fw.current("api");
    let new = fw.update(&api, ModuleSpec::new().exports("org.api").imports("org.log"));

    // Both revisions are live until the dependents are refreshed.
    assert!(registry.has_dependents(&old));
    assert!(!registry.has_dependents(&new));

    // Refresh: tear down the dependents and the stale api wiring, purge the
    // old revision, then re-resolve everything against the new one.
    for name in ["app", "cli"] {
        teardown(&registry, &fw.module(name));
    }
    registry.remove_dependencies(&api);
    old.invalidate_wiring();
    let purged = api.purge_revisions();
    assert_eq!(purged.len(), 1);
    assert!(!registry.has_dependents_for_module(&api));

    let (log, app, cli) = (fw.current("log"), fw.current("app"), fw.current("cli"));
    record(&registry, resolve(&new, vec![import_package(&new, &log, "org.log")]));
    record(&registry, resolve(&app, vec![import_package(&app, &new, "org.api")]));
    record(&registry, resolve(&cli, vec![require_module(&cli, &new, "api")]));

    let provided = registry.get_provided_wires(&new, None);
    assert_eq!(provided.len(), 2);
    assert!(provided.iter().all(|w| w.provider().id() == new.id()));
    assert_eq!(
        registry.get_requiring_modules(&api),
        HashSet::from([fw.module("cli").id()])
    );
}

#[test]
fn fragment_keeps_host_in_use() {
    let mut fw = TestFramework::new();
    fw.install("host", ModuleSpec::new());
    fw.install("frag", ModuleSpec::new().fragment_of("host"));
    let registry = WiringRegistry::new();

    let (host, frag) = (fw.current("host"), fw.current("frag"));
    record(&registry, resolve(&frag, vec![attach_fragment(&frag, &host, "host")]));

    assert_eq!(
        uninstall(&registry, &fw.module("frag")),
        Uninstall::Deferred(HashSet::from([fw.module("host").id()]))
    );
    assert_eq!(
        uninstall(&registry, &fw.module("host")),
        Uninstall::Deferred(HashSet::from([fw.module("frag").id()]))
    );

    // Once the host is torn down the fragment no longer counts as in use.
    let host_module = fw.module("host");
    teardown(&registry, &host_module);
    frag.invalidate_wiring();
    assert!(!registry.has_dependents(&frag));
}

#[test]
fn shutdown_with_providers_first_leaves_their_entries() {
    let (fw, registry) = layered();
    let modules: Vec<Arc<Module>> = ["log", "api", "app", "cli"]
        .iter()
        .map(|n| fw.module(n))
        .collect();

    // Providers first: their wirings are gone when dependents are removed.
    for module in &modules {
        teardown(&registry, module);
    }

    // Only wires whose providers were disposed before their requirers remain.
    let snapshot = registry.snapshot();
    let providers: Vec<_> = snapshot.providers.iter().map(|p| p.provider.module).collect();
    assert_eq!(providers, vec![fw.module("log").id(), fw.module("api").id()]);
    tracing::debug!(wires = snapshot.wire_count(), "Wires left after shutdown");
}
