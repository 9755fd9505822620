//! # Debounce Scheduler
//!
//! Owns the three deferred-operation slots (bank rescan, money refresh,
//! collection refresh) and applies the closed-session drop rule. The
//! scheduler only arms timers; the engine performs the actual work when the
//! corresponding [`DeferredTask`] comes back through the queue.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::ContainerId;
use signal_bus::{DeferredTask, EngineSender, PendingAction};
use tracing::{debug, trace};

use crate::classify::{classify_containers, Classification};
use crate::{DEFAULT_COLLECTION_REFRESH_DELAY, DEFAULT_MONEY_REFRESH_DELAY, DEFAULT_RESCAN_DEBOUNCE};

/// Delay table for the scheduler's three slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerDelays {
    /// Quiet period before a bank rescan fires.
    pub rescan_debounce: Duration,
    /// Quiet period before a gold re-query fires.
    pub money_refresh: Duration,
    /// Quiet period before a collection re-announcement fires.
    pub collection_refresh: Duration,
}

impl Default for SchedulerDelays {
    fn default() -> Self {
        SchedulerDelays {
            rescan_debounce: DEFAULT_RESCAN_DEBOUNCE,
            money_refresh: DEFAULT_MONEY_REFRESH_DELAY,
            collection_refresh: DEFAULT_COLLECTION_REFRESH_DELAY,
        }
    }
}

/// What the scheduler did with a slot-change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotDecision {
    /// No session open; the batch was dropped with no memory of it.
    DroppedClosed,
    /// The batch touched nothing the engine manages.
    Ignored,
    /// A rescan was scheduled (or an armed one was pushed back).
    Scheduled(Classification),
}

/// The engine's debounce front-end for change signals.
#[derive(Debug)]
pub struct ScanScheduler {
    delays: SchedulerDelays,
    rescan: PendingAction,
    money: PendingAction,
    collections: PendingAction,
}

impl ScanScheduler {
    /// Creates a scheduler with the default delay table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delays(SchedulerDelays::default())
    }

    /// Creates a scheduler with an explicit delay table.
    #[must_use]
    pub fn with_delays(delays: SchedulerDelays) -> Self {
        ScanScheduler {
            delays,
            rescan: PendingAction::new("bank-rescan"),
            money: PendingAction::new("money-refresh"),
            collections: PendingAction::new("collection-refresh"),
        }
    }

    /// Handles a slot-change batch.
    ///
    /// Drops it when no session is open, ignores it when it touches nothing
    /// managed, otherwise cancels and re-arms the rescan timer.
    pub fn on_slot_changes(
        &mut self,
        queue: &EngineSender,
        session_open: bool,
        containers: &[ContainerId],
    ) -> SlotDecision {
        if !session_open {
            trace!(batch = containers.len(), "Slot change with no session; dropped");
            return SlotDecision::DroppedClosed;
        }
        let classification = classify_containers(containers);
        if !classification.affects_any() {
            trace!(?containers, "Slot change touches no managed store; ignored");
            return SlotDecision::Ignored;
        }
        debug!(
            shared = classification.shared,
            personal = classification.personal,
            carried = classification.carried,
            "Rescan debounce armed"
        );
        self.rescan
            .schedule(queue, DeferredTask::FireRescan, self.delays.rescan_debounce);
        SlotDecision::Scheduled(classification)
    }

    /// Handles a money-change signal. Returns `true` if a refresh was armed.
    pub fn on_currency_changed(&mut self, queue: &EngineSender, session_open: bool) -> bool {
        if !session_open {
            return false;
        }
        self.money
            .schedule(queue, DeferredTask::MoneyRefresh, self.delays.money_refresh);
        true
    }

    /// Handles a reputation/collection signal. Returns `true` if armed.
    pub fn on_reputation_changed(&mut self, queue: &EngineSender, session_open: bool) -> bool {
        if !session_open {
            return false;
        }
        self.collections.schedule(
            queue,
            DeferredTask::CollectionRefresh,
            self.delays.collection_refresh,
        );
        true
    }

    /// Whether a rescan timer is currently armed.
    #[must_use]
    pub fn rescan_pending(&self) -> bool {
        self.rescan.is_pending()
    }

    /// Cancels a pending rescan; used when the session closes under it.
    pub fn cancel_rescan(&mut self) {
        self.rescan.cancel();
    }

    /// Cancels every armed timer; used by emergency recovery.
    pub fn cancel_all(&mut self) {
        self.rescan.cancel();
        self.money.cancel();
        self.collections.cancel();
    }
}

impl Default for ScanScheduler {
    fn default() -> Self {
        Self::new()
    }
}
