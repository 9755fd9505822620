//! Error types for the cache store subsystem.

use shared_types::StoreKind;
use thiserror::Error;

/// Errors from snapshot scans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Every tab of the store answered "unavailable" this pass. The existing
    /// snapshot must be left untouched; the next session open retries.
    #[error("{store} store is not enumerable right now")]
    StoreInaccessible {
        /// Which store refused enumeration.
        store: StoreKind,
    },
}

/// Result alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
