//! Module and revision identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Framework-assigned module identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u64);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ModuleId {
    /// The identifier of this module's revision with the given sequence.
    pub fn revision(self, sequence: u32) -> RevisionId {
        RevisionId {
            module: self,
            sequence,
        }
    }
}

/// Identifies one revision of a module.
///
/// The sequence number counts updates of the owning module, starting at
/// zero for the revision created at install time. Displayed as
/// `<module>.<sequence>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RevisionId {
    pub module: ModuleId,
    pub sequence: u32,
}

impl RevisionId {
    pub fn new(module: u64, sequence: u32) -> Self {
        ModuleId(module).revision(sequence)
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.sequence)
    }
}
