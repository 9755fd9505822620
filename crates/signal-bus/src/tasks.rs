//! # Deferred Tasks
//!
//! Continuations the engine schedules for itself. A deferred task is not a
//! suspension point: when its timer expires it re-enters the engine queue
//! and runs as an ordinary handler, after whatever signals arrived first.

use serde::{Deserialize, Serialize};

/// Every timer-driven continuation the engine schedules.
///
/// Each variant corresponds to exactly one [`PendingAction`] slot in the
/// engine, which is what enforces the at-most-one-outstanding rule per
/// logical operation.
///
/// [`PendingAction`]: crate::pending::PendingAction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Show the engine's own bank window after the open settle delay.
    ShowOwnWindow,
    /// Check whether the shared store is enumerable this session.
    ProbeSharedAccess,
    /// Run the debounced rescan of all open stores.
    FireRescan,
    /// Re-query gold for open stores after a money change burst.
    MoneyRefresh,
    /// Re-announce collection data after a reputation change burst.
    CollectionRefresh,
    /// Present the next queued conflict prompt.
    NextConflictPrompt,
    /// Re-run conflict detection after an extension load settles.
    ConflictRecheck,
}

impl DeferredTask {
    /// Stable task name for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DeferredTask::ShowOwnWindow => "show_own_window",
            DeferredTask::ProbeSharedAccess => "probe_shared_access",
            DeferredTask::FireRescan => "fire_rescan",
            DeferredTask::MoneyRefresh => "money_refresh",
            DeferredTask::CollectionRefresh => "collection_refresh",
            DeferredTask::NextConflictPrompt => "next_conflict_prompt",
            DeferredTask::ConflictRecheck => "conflict_recheck",
        }
    }
}
