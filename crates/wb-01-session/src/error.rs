//! Engine-level error type.
//!
//! Handlers return these to the dispatch boundary, which records them in
//! the fault ring and carries on. Nothing converts them into a crash.

use saved_vars::SavedVarsError;
use thiserror::Error;
use wb_02_conflict_registry::ConflictError;
use wb_04_cache_store::ScanError;

/// Any failure a handler or exposed operation can report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A store scan could not run.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A conflict-protocol step was rejected or its host action failed.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Saving or loading the persisted document failed.
    #[error(transparent)]
    Persistence(#[from] SavedVarsError),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
