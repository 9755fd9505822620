//! # Pending Actions
//!
//! A [`PendingAction`] is the engine's cancel-and-replace timer slot: it
//! holds at most one live deferred-task timer, and scheduling a new one
//! always cancels the old one first. Debouncing falls out of that rule:
//! a burst of N schedule calls leaves exactly one timer, reset to the
//! latest deadline.
//!
//! Cancellation aborts the timer task at its sleep point. This is reliable
//! because every schedule/cancel happens from the single engine task before
//! it yields; an expired-but-unpolled timer is still aborted before it can
//! push its task.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::queue::EngineSender;
use crate::tasks::DeferredTask;

/// One cancel-and-replace timer slot for a logical engine operation.
#[derive(Debug)]
pub struct PendingAction {
    label: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl PendingAction {
    /// Creates an idle slot. The label names the logical operation in logs.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        PendingAction {
            label,
            handle: None,
        }
    }

    /// Returns `true` while a timer is armed and has not fired.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// The operation label this slot was created with.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Arms the timer: after `delay`, push `task` into the engine queue.
    ///
    /// Any previously armed timer is canceled first. A queue that has shut
    /// down makes the fire a no-op rather than an error; timers outliving
    /// the engine are expected during teardown.
    pub fn schedule(&mut self, queue: &EngineSender, task: DeferredTask, delay: Duration) {
        self.cancel();
        debug!(
            slot = self.label,
            task = task.kind(),
            delay_ms = delay.as_millis() as u64,
            "Deferred task scheduled"
        );
        let queue = queue.clone();
        // The deadline must anchor at schedule time, not at the spawned
        // task's first poll: under a paused test clock the task may not be
        // polled until after time has already been advanced.
        let sleep = tokio::time::sleep(delay);
        self.handle = Some(tokio::spawn(async move {
            sleep.await;
            let _ = queue.task(task);
        }));
    }

    /// Disarms the timer if one is live.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!(slot = self.label, "Pending action canceled");
            }
            handle.abort();
        }
    }
}

impl Drop for PendingAction {
    fn drop(&mut self) {
        self.cancel();
    }
}
