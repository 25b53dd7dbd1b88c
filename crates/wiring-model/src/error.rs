//! Error types for wiring-model

use crate::id::{ModuleId, RevisionId};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a wire, wiring or revision history is malformed.
///
/// These never arise from a correct resolver or lifecycle manager; they
/// signal a caller bug and are reported at construction time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("capability owned by {capability_owner} cannot be provided by revision {provider}")]
    ProviderMismatch {
        capability_owner: RevisionId,
        provider: RevisionId,
    },

    #[error("requirement owned by {requirement_owner} cannot be held by revision {requirer}")]
    RequirerMismatch {
        requirement_owner: RevisionId,
        requirer: RevisionId,
    },

    #[error("requirement namespace '{requirement}' does not match capability namespace '{capability}'")]
    NamespaceMismatch {
        requirement: String,
        capability: String,
    },

    #[error("fragment revision {provider} cannot provide capabilities directly")]
    FragmentProvider { provider: RevisionId },

    #[error("wire required by {requirer} cannot be attached to the wiring of {revision}")]
    ForeignWire {
        requirer: RevisionId,
        revision: RevisionId,
    },

    #[error("revision {revision} does not belong to module {module}")]
    ForeignRevision {
        module: ModuleId,
        revision: RevisionId,
    },
}
