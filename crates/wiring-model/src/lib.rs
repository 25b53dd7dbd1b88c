//! Value types for the module wiring registry.
//!
//! A [`Module`] owns an ordered history of [`Revision`]s. Each revision
//! declares [`Capability`]s it offers and [`Requirement`]s it needs. Once a
//! revision is resolved, its [`Wiring`] holds the [`Wire`]s that connect its
//! requirements to capabilities of other revisions.
//!
//! # Modules
//!
//! - [`id`]: module and revision identifiers
//! - [`namespace`]: well-known capability namespaces
//! - [`attribute`]: capability attribute values
//! - [`capability`]: capabilities and requirements
//! - [`revision`]: revisions, fragments and wirings
//! - [`module`]: modules and their revision history
//! - [`wire`]: resolved dependency edges

pub mod attribute;
pub mod capability;
pub mod error;
pub mod id;
pub mod module;
pub mod namespace;
pub mod revision;
pub mod wire;

pub use attribute::AttributeValue;
pub use capability::{Capability, Requirement};
pub use error::{Error, Result};
pub use id::{ModuleId, RevisionId};
pub use module::Module;
pub use revision::{Revision, RevisionBuilder, RevisionKind, Wiring};
pub use wire::Wire;
