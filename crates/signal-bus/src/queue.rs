//! # Engine Queue
//!
//! The single ordered queue everything flows through. Host adapters and
//! expired timers push; exactly one engine task drains. Ordering between
//! two pushes from the same producer is FIFO, which is the only ordering
//! the engine relies on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::signals::HostSignal;
use crate::tasks::DeferredTask;

/// One unit of work for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An external host signal.
    Signal(HostSignal),
    /// An expired deferred-task timer.
    Task(DeferredTask),
}

/// The engine side of the queue has shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("engine queue is closed")]
pub struct QueueClosed;

/// Producer handle; cheap to clone, safe to hold in adapters and timers.
#[derive(Debug, Clone)]
pub struct EngineSender {
    tx: mpsc::UnboundedSender<EngineEvent>,
    enqueued: Arc<AtomicU64>,
}

impl EngineSender {
    /// Enqueues a host signal.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] if the engine has shut down.
    pub fn signal(&self, signal: HostSignal) -> Result<(), QueueClosed> {
        debug!(signal = signal.kind(), "Signal enqueued");
        self.push(EngineEvent::Signal(signal))
    }

    /// Enqueues an expired deferred task.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] if the engine has shut down.
    pub fn task(&self, task: DeferredTask) -> Result<(), QueueClosed> {
        debug!(task = task.kind(), "Deferred task enqueued");
        self.push(EngineEvent::Task(task))
    }

    /// Total events pushed through this queue since creation.
    #[must_use]
    pub fn events_enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    fn push(&self, event: EngineEvent) -> Result<(), QueueClosed> {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        self.tx.send(event).map_err(|_| QueueClosed)
    }
}

/// Consumer handle; owned by the single engine task.
#[derive(Debug)]
pub struct EngineReceiver {
    rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineReceiver {
    /// Waits for the next event.
    ///
    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.rx.recv().await
    }

    /// Takes an already-queued event without waiting.
    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.rx.try_recv().ok()
    }
}

/// Factory for the queue's two halves.
pub struct EngineQueue;

impl EngineQueue {
    /// Creates a connected sender/receiver pair.
    #[must_use]
    pub fn channel() -> (EngineSender, EngineReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            EngineSender {
                tx,
                enqueued: Arc::new(AtomicU64::new(0)),
            },
            EngineReceiver { rx },
        )
    }
}
