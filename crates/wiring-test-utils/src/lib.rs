//! Shared test utilities for the wiring workspace.
//!
//! This crate provides standardised fixtures so registry tests do not have
//! to hand-assemble revisions, capabilities and wires. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`framework`]: [`TestFramework`] builder that installs and updates modules
//! - [`wires`]: helpers that build wires the way a resolver would

pub mod framework;
pub mod wires;

pub use framework::{ModuleSpec, TestFramework};
pub use wires::{attach_fragment, import_package, require_module, resolve};
