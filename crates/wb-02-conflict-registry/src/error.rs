//! Error types for the conflict registry subsystem.

use thiserror::Error;

/// Errors from conflict detection and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// The host refused or failed an enable/disable action. The user's
    /// choice is already persisted when this surfaces; the action just
    /// needs manual follow-up.
    #[error("could not apply conflict action for '{extension}': {reason}")]
    ActionFailed {
        /// Extension the action targeted.
        extension: String,
        /// Host-reported reason.
        reason: String,
    },

    /// A resolution arrived for an extension that is not the one currently
    /// prompting (stale UI callback or a bug in the caller).
    #[error("'{extension}' is not the extension currently prompting")]
    NotPrompting {
        /// Extension the stray resolution named.
        extension: String,
    },

    /// A resolution named an extension the registry does not know.
    #[error("'{extension}' is not a known competitor")]
    UnknownExtension {
        /// The unrecognized name.
        extension: String,
    },
}

/// Result alias for conflict operations.
pub type ConflictResult<T> = Result<T, ConflictError>;
