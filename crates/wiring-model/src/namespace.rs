//! Well-known capability namespaces.
//!
//! The registry only special-cases [`PACKAGE`] and [`MODULE`]; every other
//! namespace is indexed and queried verbatim.

/// Package-level exports. The package identifier is stored in the
/// capability attribute keyed by this same name.
pub const PACKAGE: &str = "exported-unit";

/// Whole-module references. The module's symbolic name is stored in the
/// capability attribute keyed by this same name.
pub const MODULE: &str = "module-reference";

/// Host attachment points offered to fragments.
pub const HOST: &str = "module-host";
