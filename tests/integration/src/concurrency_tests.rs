//! Concurrent access tests for the wiring registry
//!
//! Resolver, teardown and reader threads share one registry through an
//! `Arc`, the way framework collaborators do.

use std::sync::{Arc, Barrier};
use std::thread;

use wiring_model::Wire;
use wiring_registry::WiringRegistry;
use wiring_test_utils::{ModuleSpec, TestFramework, import_package, require_module, resolve};

const REQUIRERS: usize = 16;
const ROUNDS: usize = 25;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn registry_is_shareable_across_threads() {
    assert_send_sync::<WiringRegistry>();
    assert_send_sync::<Wire>();
}

/// One provider exporting `pkg.shared`, and `REQUIRERS` modules that import it
/// and require the provider as a whole.
fn fan_in() -> (TestFramework, Vec<Vec<Wire>>) {
    let mut fw = TestFramework::new();
    fw.install("provider", ModuleSpec::new().exports("pkg.shared"));
    let provider = fw.current("provider");

    let mut wires = Vec::with_capacity(REQUIRERS);
    for r in 0..REQUIRERS {
        let name = format!("requirer{r}");
        fw.install(&name, ModuleSpec::new().imports("pkg.shared").requires("provider"));
        let requirer = fw.current(&name);
        wires.push(resolve(
            &requirer,
            vec![
                import_package(&requirer, &provider, "pkg.shared"),
                require_module(&requirer, &provider, "provider"),
            ],
        ));
    }
    (fw, wires)
}

#[test]
fn concurrent_add_and_remove_leave_no_empty_entries() {
    let (fw, wires) = fan_in();
    let fw = Arc::new(fw);
    let registry = Arc::new(WiringRegistry::new());
    let barrier = Arc::new(Barrier::new(REQUIRERS + 1));

    let writers: Vec<_> = wires
        .into_iter()
        .enumerate()
        .map(|(r, wires)| {
            let fw = Arc::clone(&fw);
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let module = fw.module(&format!("requirer{r}"));
                barrier.wait();
                for _ in 0..ROUNDS {
                    for wire in &wires {
                        registry.add_dependent(wire.clone());
                    }
                    registry.remove_dependencies(&module);
                }
            })
        })
        .collect();

    let reader = {
        let fw = Arc::clone(&fw);
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let provider = fw.current("provider");
            barrier.wait();
            for _ in 0..ROUNDS * 4 {
                let dependents = registry.get_dependents(&provider);
                assert!(dependents.values().all(|wires| !wires.is_empty()));

                let snapshot = registry.snapshot();
                for entry in &snapshot.providers {
                    assert!(!entry.capabilities.is_empty());
                    assert!(entry.capabilities.iter().all(|c| !c.wires.is_empty()));
                }
            }
        })
    };

    for handle in writers {
        handle.join().expect("writer thread should not panic");
    }
    reader.join().expect("reader thread should not panic");

    assert!(registry.is_empty());
    assert!(!registry.has_dependents(&fw.current("provider")));
}

#[test]
fn concurrent_inserts_of_same_wires_are_idempotent() {
    let (fw, wires) = fan_in();
    let wires: Arc<Vec<Wire>> = Arc::new(wires.into_iter().flatten().collect());
    let registry = Arc::new(WiringRegistry::new());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let wires = Arc::clone(&wires);
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for wire in wires.iter() {
                    registry.add_dependent(wire.clone());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    assert_eq!(registry.len(), REQUIRERS * 2);
    assert_eq!(registry.provider_count(), 1);
    assert_eq!(
        registry.get_requiring_modules(&fw.module("provider")).len(),
        REQUIRERS
    );
}

#[test]
fn removal_racing_shutdown_never_fails() {
    let (fw, wires) = fan_in();
    let registry = Arc::new(WiringRegistry::new());
    for wire in wires.into_iter().flatten() {
        registry.add_dependent(wire);
    }
    let fw = Arc::new(fw);
    let barrier = Arc::new(Barrier::new(2));

    let shutdown = {
        let fw = Arc::clone(&fw);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            fw.current("provider").invalidate_wiring();
        })
    };

    let teardown = {
        let fw = Arc::clone(&fw);
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for r in 0..REQUIRERS {
                registry.remove_dependencies(&fw.module(&format!("requirer{r}")));
            }
        })
    };

    shutdown.join().expect("shutdown thread should not panic");
    teardown.join().expect("teardown thread should not panic");

    // Whatever survived was skipped because the provider was already gone.
    let remaining = registry.len();
    assert!(remaining <= REQUIRERS * 2);
    assert_eq!(registry.has_dependents(&fw.current("provider")), remaining > 0);
}
