//! In-memory stand-in for the module lifecycle manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use wiring_model::{Module, ModuleId, Revision, namespace};

/// Declared contents of a module revision.
#[derive(Debug, Clone, Default)]
pub struct ModuleSpec {
    exports: Vec<String>,
    imports: Vec<String>,
    required_modules: Vec<String>,
    host: Option<String>,
}

impl ModuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a package.
    pub fn exports(mut self, package: &str) -> Self {
        self.exports.push(package.to_string());
        self
    }

    /// Declare a package import.
    pub fn imports(mut self, package: &str) -> Self {
        self.imports.push(package.to_string());
        self
    }

    /// Declare a whole-module requirement.
    pub fn requires(mut self, symbolic_name: &str) -> Self {
        self.required_modules.push(symbolic_name.to_string());
        self
    }

    /// Make this a fragment of the module with the given symbolic name.
    pub fn fragment_of(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }
}

/// Installs and updates modules with sequential ids.
///
/// Normal revisions always offer a module reference and a host capability
/// named after the module. Fragment revisions offer nothing of their own:
/// they require their host, and their exports are declared as-is so tests
/// can re-own them with `Capability::hosted_by`.
#[derive(Debug)]
pub struct TestFramework {
    next_id: u64,
    modules: BTreeMap<String, Arc<Module>>,
}

impl Default for TestFramework {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFramework {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            modules: BTreeMap::new(),
        }
    }

    /// Install a module with an initial revision built from `spec`.
    ///
    /// # Panics
    ///
    /// Panics if a fragment's host has not been installed yet.
    pub fn install(&mut self, name: &str, spec: ModuleSpec) -> Arc<Module> {
        let module = Arc::new(Module::new(ModuleId(self.next_id), name));
        self.next_id += 1;
        self.add_revision(&module, &spec);
        self.modules.insert(name.to_string(), Arc::clone(&module));
        module
    }

    /// Append a new revision to `module`, returning it.
    pub fn update(&mut self, module: &Arc<Module>, spec: ModuleSpec) -> Arc<Revision> {
        self.add_revision(module, &spec)
    }

    /// Look up an installed module by symbolic name.
    ///
    /// # Panics
    ///
    /// Panics if no module with that name was installed.
    pub fn module(&self, name: &str) -> Arc<Module> {
        self.modules
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("module '{name}' is not installed"))
    }

    /// Current revision of the named module.
    pub fn current(&self, name: &str) -> Arc<Revision> {
        self.module(name)
            .current_revision()
            .unwrap_or_else(|| panic!("module '{name}' has no revisions"))
    }

    fn add_revision(&self, module: &Arc<Module>, spec: &ModuleSpec) -> Arc<Revision> {
        let mut builder = Revision::builder(module.next_revision_id());

        match &spec.host {
            Some(host) => {
                builder = builder
                    .fragment_of(self.current(host).id())
                    .requirement(namespace::HOST, format!("({}={host})", namespace::HOST));
            }
            None => {
                builder = builder
                    .module_reference(module.symbolic_name())
                    .host(module.symbolic_name());
            }
        }
        for package in &spec.exports {
            builder = builder.package(package.as_str());
        }
        for package in &spec.imports {
            builder = builder.requirement(
                namespace::PACKAGE,
                format!("({}={package})", namespace::PACKAGE),
            );
        }
        for name in &spec.required_modules {
            builder = builder.requirement(
                namespace::MODULE,
                format!("({}={name})", namespace::MODULE),
            );
        }

        let revision = builder.build();
        module
            .add_revision(Arc::clone(&revision))
            .expect("fixture revision ids always match their module");
        revision
    }
}
