//! Dependency wiring registry.
//!
//! The [`WiringRegistry`] records, for every provider revision, which wires
//! currently depend on each of its capabilities. The resolver feeds it one
//! wire at a time; the lifecycle manager removes a module's wires in bulk
//! when the module is refreshed or uninstalled, and asks it who would break
//! if a module went away.
//!
//! One registry instance is shared by all framework threads, typically as an
//! `Arc<WiringRegistry>` handed to each collaborator.
//!
//! ```
//! use std::sync::Arc;
//! use wiring_model::{ModuleId, Revision, Wire, namespace};
//! use wiring_registry::WiringRegistry;
//!
//! let api = Revision::builder(ModuleId(1).revision(0)).package("org.example.api").build();
//! let app = Revision::builder(ModuleId(2).revision(0))
//!     .requirement(namespace::PACKAGE, "(exported-unit=org.example.api)")
//!     .build();
//!
//! let wire = Wire::new(
//!     Arc::clone(&app),
//!     app.requirements(None).next().unwrap().clone(),
//!     Arc::clone(&api),
//!     api.capabilities(None).next().unwrap().clone(),
//! )
//! .unwrap();
//!
//! let registry = WiringRegistry::new();
//! registry.add_dependent(wire);
//! assert!(registry.has_dependents(&api));
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod snapshot;

pub use config::{LogConfig, RegistryConfig};
pub use error::{Error, Result};
pub use registry::{CapabilityMap, WiringRegistry};
pub use snapshot::{CapabilityEntry, ProviderEntry, RegistrySnapshot, WireEntry};
